//! Single-line encoding used to share one level between players.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_chase_world::LevelSpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TRANSFER_DOMAIN: &str = "maze";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const TRANSFER_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct TransferPayload {
    name: String,
    layout: Vec<String>,
}

/// Errors that can occur while decoding level transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    #[error("level string was empty")]
    EmptyPayload,
    #[error("level string is missing the prefix")]
    MissingPrefix,
    #[error("level string is missing the version")]
    MissingVersion,
    #[error("level string is missing the grid dimensions")]
    MissingDimensions,
    #[error("level string is missing the payload")]
    MissingPayload,
    #[error("level prefix '{0}' is not supported")]
    InvalidPrefix(String),
    #[error("level version '{0}' is not supported")]
    UnsupportedVersion(String),
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    #[error("could not decode level payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    #[error("could not parse level payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    #[error("header announces {expected_columns}x{expected_rows} but the layout is {columns}x{rows}")]
    DimensionMismatch {
        expected_columns: u32,
        expected_rows: u32,
        columns: u32,
        rows: u32,
    },
}

/// Encodes a level into a single-line string suitable for clipboard transfer.
pub(crate) fn encode(level: &LevelSpec) -> String {
    let (columns, rows) = layout_dimensions(&level.layout);
    let payload = TransferPayload {
        name: level.name.clone(),
        layout: level.layout.clone(),
    };
    let json = serde_json::to_vec(&payload).expect("level payload serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!("{TRANSFER_HEADER}:{columns}x{rows}:{encoded}")
}

/// Decodes a level from its transfer string.
///
/// Only the framing and the announced dimensions are checked here; glyph
/// validation happens when the level is loaded into a world.
pub(crate) fn decode(value: &str) -> Result<LevelSpec, LayoutTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LayoutTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (expected_columns, expected_rows) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LayoutTransferError::InvalidEncoding)?;
    let decoded: TransferPayload =
        serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

    let (columns, rows) = layout_dimensions(&decoded.layout);
    if (columns, rows) != (expected_columns, expected_rows) {
        return Err(LayoutTransferError::DimensionMismatch {
            expected_columns,
            expected_rows,
            columns,
            rows,
        });
    }

    Ok(LevelSpec {
        name: decoded.name,
        layout: decoded.layout,
    })
}

fn layout_dimensions(layout: &[String]) -> (u32, u32) {
    let columns = layout.first().map_or(0, |row| row.chars().count());
    (
        u32::try_from(columns).unwrap_or(u32::MAX),
        u32::try_from(layout.len()).unwrap_or(u32::MAX),
    )
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }

    Ok((columns, rows))
}
