use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One waitlist/investor-interest record captured from the public form.
///
/// Wire field names (`type`, `timestamp`, `investmentRange`) match the
/// landing-page payload and the flat-file layout, so records round-trip
/// unchanged between backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SubmissionKind,
    pub name: String,
    pub email: String,
    pub company: String,
    pub role: String,
    pub message: String,
    #[serde(rename = "investmentRange", skip_serializing_if = "Option::is_none")]
    pub investment_range: Option<InvestmentRange>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Which form the submission came from. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionKind {
    #[serde(rename = "investor")]
    Investor,
    #[serde(rename = "early-access")]
    EarlyAccess,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Investor => "investor",
            SubmissionKind::EarlyAccess => "early-access",
        }
    }
}

impl std::fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown submission kind: {0}")]
pub struct ParseKindError(pub String);

impl std::str::FromStr for SubmissionKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "investor" => Ok(SubmissionKind::Investor),
            "early-access" => Ok(SubmissionKind::EarlyAccess),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}

/// Self-reported investment bucket. Only valid on investor submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestmentRange {
    #[serde(rename = "under-50k")]
    Under50k,
    #[serde(rename = "50k-250k")]
    UpTo250k,
    #[serde(rename = "250k-1m")]
    UpTo1M,
    #[serde(rename = "over-1m")]
    Over1M,
}

impl InvestmentRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentRange::Under50k => "under-50k",
            InvestmentRange::UpTo250k => "50k-250k",
            InvestmentRange::UpTo1M => "250k-1m",
            InvestmentRange::Over1M => "over-1m",
        }
    }
}

impl std::fmt::Display for InvestmentRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown investment range: {0}")]
pub struct ParseRangeError(pub String);

impl std::str::FromStr for InvestmentRange {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "under-50k" => Ok(InvestmentRange::Under50k),
            "50k-250k" => Ok(InvestmentRange::UpTo250k),
            "250k-1m" => Ok(InvestmentRange::UpTo1M),
            "over-1m" => Ok(InvestmentRange::Over1M),
            other => Err(ParseRangeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Submission {
        Submission {
            id: "sub-1".to_string(),
            kind: SubmissionKind::Investor,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            company: "Analytical Engines".to_string(),
            role: "Partner".to_string(),
            message: "Interested in the seed round".to_string(),
            investment_range: Some(InvestmentRange::UpTo250k),
            created_at: Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "investor");
        assert_eq!(json["investmentRange"], "50k-250k");
        assert!(json.get("timestamp").is_some());
        assert!(json.get("kind").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn omits_investment_range_when_absent() {
        let mut sub = sample();
        sub.kind = SubmissionKind::EarlyAccess;
        sub.investment_range = None;
        let json = serde_json::to_value(sub).unwrap();
        assert_eq!(json["type"], "early-access");
        assert!(json.get("investmentRange").is_none());
    }

    #[test]
    fn roundtrips_through_json() {
        let sub = sample();
        let json = serde_json::to_string(&sub).unwrap();
        let back: Submission = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sub);
    }

    #[test]
    fn kind_parses_known_values() {
        assert_eq!("investor".parse::<SubmissionKind>().unwrap(), SubmissionKind::Investor);
        assert_eq!(
            "early-access".parse::<SubmissionKind>().unwrap(),
            SubmissionKind::EarlyAccess
        );
        assert!("vip".parse::<SubmissionKind>().is_err());
    }

    #[test]
    fn range_parses_known_values() {
        assert_eq!("under-50k".parse::<InvestmentRange>().unwrap(), InvestmentRange::Under50k);
        assert_eq!("over-1m".parse::<InvestmentRange>().unwrap(), InvestmentRange::Over1M);
        assert!("a-lot".parse::<InvestmentRange>().is_err());
    }
}
