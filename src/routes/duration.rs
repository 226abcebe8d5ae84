// Route age codec: "[<weeks>w][<days>d] HH:MM:SS" <-> seconds

use crate::error::FormatError;

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const SECONDS_PER_HOUR: u64 = SECONDS_PER_MINUTE * 60;
pub const SECONDS_PER_DAY: u64 = SECONDS_PER_HOUR * 24;
pub const SECONDS_PER_WEEK: u64 = SECONDS_PER_DAY * 7;

/// Convert an age string to a number of seconds.
///
/// Accepts `HH:MM:SS`, `<d>d HH:MM:SS` and `<w>w<d>d HH:MM:SS`. Field ranges
/// are not checked, so `00:90:00` is 5400 seconds.
pub fn decode(text: &str) -> Result<u64, FormatError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (date, time) = match tokens.as_slice() {
        [time] => (None, *time),
        [date, time] => (Some(*date), *time),
        _ => {
            return Err(FormatError::new(
                text,
                "expected an optional date and a time field",
            ));
        }
    };

    let fields: Vec<&str> = time.split(':').collect();
    let [hours, minutes, seconds] = fields.as_slice() else {
        return Err(FormatError::new(text, "expected time as HH:MM:SS"));
    };

    let mut total = number(seconds, text)?;
    total = accumulate(total, number(minutes, text)?, SECONDS_PER_MINUTE, text)?;
    total = accumulate(total, number(hours, text)?, SECONDS_PER_HOUR, text)?;

    if let Some(date) = date {
        let date = date.strip_suffix('d').unwrap_or(date);
        let parts: Vec<&str> = date.split('w').collect();
        match parts.as_slice() {
            [days] => {
                total = accumulate(total, number(days, text)?, SECONDS_PER_DAY, text)?;
            }
            [weeks, days] => {
                total = accumulate(total, number(weeks, text)?, SECONDS_PER_WEEK, text)?;
                total = accumulate(total, number(days, text)?, SECONDS_PER_DAY, text)?;
            }
            _ => return Err(FormatError::new(text, "expected date as [<w>w]<d>d")),
        }
    }

    Ok(total)
}

/// Render seconds in the canonical age form.
///
/// Weeks appear only when nonzero; days appear when weeks or days are nonzero.
pub fn encode(seconds: u64) -> String {
    let weeks = seconds / SECONDS_PER_WEEK;
    let rest = seconds % SECONDS_PER_WEEK;
    let days = rest / SECONDS_PER_DAY;
    let rest = rest % SECONDS_PER_DAY;
    let hours = rest / SECONDS_PER_HOUR;
    let rest = rest % SECONDS_PER_HOUR;
    let minutes = rest / SECONDS_PER_MINUTE;
    let secs = rest % SECONDS_PER_MINUTE;

    let mut age = String::new();
    if weeks > 0 {
        age.push_str(&format!("{}w", weeks));
    }
    if weeks > 0 || days > 0 {
        age.push_str(&format!("{}d ", days));
    }
    age.push_str(&format!("{:02}:{:02}:{:02}", hours, minutes, secs));
    age
}

/// `total + count * unit`, failing instead of overflowing
fn accumulate(total: u64, count: u64, unit: u64, text: &str) -> Result<u64, FormatError> {
    count
        .checked_mul(unit)
        .and_then(|seconds| total.checked_add(seconds))
        .ok_or_else(|| FormatError::new(text, "duration is too large"))
}

fn number(field: &str, text: &str) -> Result<u64, FormatError> {
    field
        .parse()
        .map_err(|_| FormatError::new(text, format!("{:?} is not a number", field)))
}
