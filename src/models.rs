// Canonical bracket schema shared by the local generator and the Challonge
// mirror path. Both producers serialize through these types so the JSON
// shape is identical regardless of where the data came from.

use serde::{Deserialize, Serialize};

pub const ROUND_QUARTER: &str = "quarter";
pub const ROUND_SEMI: &str = "semi";
pub const ROUND_FINAL: &str = "final";

/// Team as embedded in a match slot. `logo_url` comes from the local roster,
/// `seed` from Challonge participants; whichever is absent is omitted from
/// the JSON rather than serialized as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Finished,
}

impl MatchStatus {
    /// Serialize to a DB-storable string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Finished => "finished",
        }
    }

    /// Parse a status string (from DB); anything unrecognized is pending.
    pub fn from_str_name(s: &str) -> Self {
        match s {
            "finished" => Self::Finished,
            _ => Self::Pending,
        }
    }
}

/// One match in its reader-facing shape. An unassigned team slot is omitted
/// from the JSON entirely; `winner_id` stays an explicit null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: i64,
    pub round: String,
    pub match_number: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team1: Option<TeamRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team2: Option<TeamRef>,
    pub team1_score: i64,
    pub team2_score: i64,
    pub winner_id: Option<i64>,
    pub status: MatchStatus,
}

/// Split a combined score representation ("3-1") on the first `-` into two
/// integers. Total: an absent field is 0-0, and each half independently
/// defaults to 0 when missing or unparsable, so a malformed value never
/// fails the request.
pub fn parse_score_pair(scores: Option<&str>) -> (i64, i64) {
    let Some(raw) = scores else {
        return (0, 0);
    };
    let (left, right) = raw.split_once('-').unwrap_or((raw, ""));
    (
        left.trim().parse().unwrap_or(0),
        right.trim().parse().unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_score_pair() {
        assert_eq!(parse_score_pair(Some("3-1")), (3, 1));
        assert_eq!(parse_score_pair(Some("10-7")), (10, 7));
        assert_eq!(parse_score_pair(Some("0-0")), (0, 0));
        assert_eq!(parse_score_pair(None), (0, 0));
    }

    #[test]
    fn test_parse_score_pair_malformed_never_panics() {
        assert_eq!(parse_score_pair(Some("")), (0, 0));
        assert_eq!(parse_score_pair(Some("abc")), (0, 0));
        assert_eq!(parse_score_pair(Some("3-")), (3, 0));
        assert_eq!(parse_score_pair(Some("-2")), (0, 2));
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(MatchStatus::from_str_name("finished"), MatchStatus::Finished);
        assert_eq!(MatchStatus::from_str_name("pending"), MatchStatus::Pending);
        assert_eq!(MatchStatus::from_str_name("open"), MatchStatus::Pending);
        assert_eq!(MatchStatus::Finished.as_str(), "finished");
    }

    #[test]
    fn test_empty_slots_are_omitted_winner_is_null() {
        let m = BracketMatch {
            id: 5,
            round: ROUND_SEMI.to_string(),
            match_number: 1,
            team1: None,
            team2: None,
            team1_score: 0,
            team2_score: 0,
            winner_id: None,
            status: MatchStatus::Pending,
        };
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(
            v,
            json!({
                "id": 5,
                "round": "semi",
                "match_number": 1,
                "team1_score": 0,
                "team2_score": 0,
                "winner_id": null,
                "status": "pending"
            })
        );
    }

    #[test]
    fn test_team_ref_omits_absent_fields() {
        let local = TeamRef {
            id: 3,
            name: "Vipers".into(),
            logo_url: None,
            seed: None,
        };
        assert_eq!(
            serde_json::to_value(&local).unwrap(),
            json!({"id": 3, "name": "Vipers"})
        );
    }
}
