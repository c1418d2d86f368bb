use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "ok": true,
                "message": message
            });

            if let (Some(Value::Object(fields)), Value::Object(target)) = (data, &mut response) {
                target.extend(fields);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: OutputFormat, message: &str) {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "ok": false,
                "message": message
            });
            println!("{}", response);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
}
