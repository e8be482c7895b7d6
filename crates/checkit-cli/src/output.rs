use serde::Serialize;

#[derive(Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    pub api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn output_success<T: Serialize>(data: T) {
    let response = CliResponse {
        success: true,
        api_version: env!("CARGO_PKG_VERSION"),
        data: Some(data),
        error: None,
    };
    match serde_json::to_string(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => output_error(&format!("Could not serialize response: {e}")),
    }
}

/// Prints an error envelope to stderr and exits with status 1.
pub fn output_error(message: &str) -> ! {
    let response: CliResponse<()> = CliResponse {
        success: false,
        api_version: env!("CARGO_PKG_VERSION"),
        data: None,
        error: Some(message.to_string()),
    };
    let json = serde_json::to_string(&response)
        .unwrap_or_else(|_| format!("{{\"success\":false,\"error\":{message:?}}}"));
    eprintln!("{}", json);
    std::process::exit(1);
}
