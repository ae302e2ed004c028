//! Inbound text protocol.
//!
//! Every text frame from a connection is either a heartbeat
//! (`connection active(<channel>):...` / `ping(<channel>):...`) or a donation
//! alert of the form
//!
//! ```text
//! [<channel>] - <donor> - <amount> - <type> - <message>
//! ```
//!
//! where the message may itself contain the `" - "` delimiter.

use std::{str::FromStr, sync::LazyLock};

use chrono::NaiveDateTime;
use regex::Regex;
use rust_decimal::{Decimal, prelude::FromPrimitive};

use super::{entity::Donation, error::ParseError, value_object::ChannelName};

/// Field delimiter of a donation alert
pub const FIELD_DELIMITER: &str = " - ";

/// Channel, donor, amount, type, message
pub const MIN_FIELDS: usize = 5;

const HEARTBEAT_PREFIXES: [&str; 2] = ["connection active", "ping"];

static HEARTBEAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:connection active|ping)\s*\((.*?)\):").expect("heartbeat regex should compile")
});

static AMOUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9.,]+").expect("amount regex should compile"));

/// Classification of one inbound text frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage<'a> {
    /// Liveness signal for a channel
    Heartbeat(ChannelName),
    /// Anything else: candidate donation text
    Donation(&'a str),
    /// Heartbeat prefix without a well-formed `(<channel>):` part
    Ignored,
}

/// Classify a text frame as heartbeat or donation
pub fn classify(text: &str) -> InboundMessage<'_> {
    if !HEARTBEAT_PREFIXES
        .iter()
        .any(|prefix| text.starts_with(prefix))
    {
        return InboundMessage::Donation(text);
    }

    match HEARTBEAT_REGEX.captures(text) {
        Some(captures) => {
            let label = captures.get(1).map_or("", |m| m.as_str());
            InboundMessage::Heartbeat(ChannelName::new(label))
        }
        None => InboundMessage::Ignored,
    }
}

/// Parse a donation alert, stamping it with `now`
pub fn parse_donation(text: &str, now: NaiveDateTime) -> Result<Donation, ParseError> {
    let fields: Vec<&str> = text.trim().split(FIELD_DELIMITER).collect();
    if fields.len() < MIN_FIELDS {
        return Err(ParseError::InsufficientFields(fields.len()));
    }

    let channel = fields[0]
        .trim_matches(|c: char| c == '[' || c == ']' || c == ' ')
        .to_string();
    let donor_name = fields[1].trim().to_string();
    let amount = parse_amount(fields[2].trim())?;
    let donation_type = fields[3].trim().to_string();
    let message = fields[4..].join(FIELD_DELIMITER).trim().to_string();

    Ok(Donation {
        channel,
        donor_name,
        amount,
        donation_type,
        message,
        timestamp: now,
    })
}

/// First run of digits, `.` and `,` in `raw`, with `,` read as the decimal separator.
///
/// Runs with more significant digits than [`Decimal`] holds are rounded via
/// `f64`. Values beyond [`Decimal::MAX`] are rejected with
/// [`ParseError::AmountOutOfRange`].
fn parse_amount(raw: &str) -> Result<Decimal, ParseError> {
    let run = AMOUNT_REGEX
        .find(raw)
        .ok_or_else(|| ParseError::MissingAmount(raw.to_string()))?;
    let normalized = run.as_str().replace(',', ".");
    if let Ok(amount) = Decimal::from_str(&normalized) {
        return Ok(amount);
    }

    let approximate: f64 = normalized
        .parse()
        .map_err(|_| ParseError::InvalidAmount(raw.to_string()))?;
    Decimal::from_f64(approximate)
        .ok_or_else(|| ParseError::AmountOutOfRange(raw.to_string()))
}
