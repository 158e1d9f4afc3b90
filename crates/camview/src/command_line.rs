use std::num::ParseIntError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Resolution '{0}' is not in the WIDTHxHEIGHT form")]
    Format(String),

    #[error("Unable to parse '{0}': {1}")]
    Dimension(String, #[source] ParseIntError),
}

/// Parses a `WIDTHxHEIGHT` string such as `320x240`.
pub fn parse_canvas_resolution_str(arg: &str) -> Result<(u32, u32), ResolutionError> {
    let (width_str, height_str) = arg
        .split_once('x')
        .ok_or_else(|| ResolutionError::Format(arg.to_string()))?;

    let parse = |value: &str| {
        value
            .trim()
            .parse::<u32>()
            .map_err(|error| ResolutionError::Dimension(value.to_string(), error))
    };

    Ok((parse(width_str)?, parse(height_str)?))
}

#[cfg(test)]
mod tests {
    use super::parse_canvas_resolution_str;

    #[test]
    fn parses_width_and_height() {
        assert_eq!(parse_canvas_resolution_str("320x240").unwrap(), (320, 240));
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(parse_canvas_resolution_str("320").is_err());
    }

    #[test]
    fn rejects_non_numeric_dimensions() {
        assert!(parse_canvas_resolution_str("widex240").is_err());
    }
}
