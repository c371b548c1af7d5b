pub mod hosts;
pub mod save;
pub mod show;

use serde::Serialize;

use crate::error::Result;
use crate::messages::Response;

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints a controller response; returns whether it carried errors.
pub fn print_response(response: &Response) -> Result<bool> {
    print_json(response)?;
    Ok(response.has_errors())
}
