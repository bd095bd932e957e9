//! Employee resource client.

use crate::error::DoshiiResult;
use crate::http::HttpClient;
use doshii_types::Employee;

pub struct EmployeeClient {
    http: HttpClient,
}

impl EmployeeClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get(&self, id: &str) -> DoshiiResult<Employee> {
        self.http.get(&format!("/employees/{id}")).await
    }

    pub async fn list(&self) -> DoshiiResult<Vec<Employee>> {
        self.http.get("/employees").await
    }
}
