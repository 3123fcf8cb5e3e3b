//! Response utilities and macros for consistent API responses

/// Macro to create JSON responses consistently
///
/// # Example
/// ```ignore
/// ok_json!(HealthResponse {
///     status: "ok".to_string(),
/// })
/// ```
#[macro_export]
macro_rules! ok_json {
    ($data:expr) => {
        Ok(axum::Json($data))
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_ok_json_macro() {
        #[derive(serde::Serialize)]
        struct TestData {
            value: i32,
        }

        let result: crate::ApiResult<axum::Json<TestData>> = ok_json!(TestData { value: 42 });
        assert!(result.is_ok());
    }
}
