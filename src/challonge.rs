// Challonge mirror: fetches a foreign tournament and maps its matches and
// participants into the canonical bracket schema. Read-time transform only;
// nothing from this path is persisted locally.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{
    parse_score_pair, BracketMatch, MatchStatus, TeamRef, ROUND_FINAL, ROUND_QUARTER, ROUND_SEMI,
};

// ── Wire types ────────────────────────────────────────────────────────
// Challonge wraps every list element in a single-key envelope object.

#[derive(Debug, Deserialize)]
struct MatchEnvelope {
    #[serde(rename = "match")]
    inner: RawMatch,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMatch {
    pub id: i64,
    /// Negative for losers'-bracket rounds in non-single-elimination formats.
    #[serde(default)]
    pub round: i64,
    pub suggested_play_order: Option<i64>,
    pub player1_id: Option<i64>,
    pub player2_id: Option<i64>,
    pub winner_id: Option<i64>,
    pub scores_csv: Option<String>,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Deserialize)]
struct ParticipantEnvelope {
    participant: RawParticipant,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawParticipant {
    pub id: i64,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub seed: Option<i64>,
}

/// Normalized view of one foreign tournament: the tournament object is
/// passed through untouched, matches and participants are canonical.
#[derive(Debug, Serialize)]
pub struct BracketSnapshot {
    pub tournament: Value,
    pub matches: Vec<BracketMatch>,
    pub participants: Vec<TeamRef>,
}

// ── Client ────────────────────────────────────────────────────────────

/// Challonge API client. Built explicitly from `Config`; fails fast when the
/// credential is missing.
#[derive(Debug, Clone)]
pub struct ChallongeClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl ChallongeClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let api_key = config
            .challonge_api_key
            .clone()
            .ok_or_else(|| AppError::Configuration("CHALLONGE_API_KEY not configured".into()))?;
        let client = Client::builder()
            .user_agent("bracket-backend/0.1")
            .build()?;
        Ok(Self {
            client,
            base_url: config.challonge_base_url.clone(),
            api_key,
            timeout: Duration::from_secs(10),
        })
    }

    /// Fetch and normalize one tournament.
    ///
    /// The tournament resource is the primary fetch: a non-2xx response is a
    /// hard error carrying the foreign status code. Matches and participants
    /// are secondary; their failures degrade to empty collections, since a
    /// partial bracket is still useful to a viewer.
    pub async fn fetch_bracket(&self, tournament_id: &str) -> Result<BracketSnapshot, AppError> {
        let tournament: Value = self
            .get_json(&format!("{}/tournaments/{}.json", self.base_url, tournament_id))
            .await?;

        let matches = match self
            .get_json::<Vec<MatchEnvelope>>(&format!(
                "{}/tournaments/{}/matches.json",
                self.base_url, tournament_id
            ))
            .await
        {
            Ok(envelopes) => envelopes.into_iter().map(|e| e.inner).collect(),
            Err(e) => {
                tracing::warn!("challonge matches fetch degraded to empty: {e}");
                Vec::new()
            }
        };

        let participants = match self
            .get_json::<Vec<ParticipantEnvelope>>(&format!(
                "{}/tournaments/{}/participants.json",
                self.base_url, tournament_id
            ))
            .await
        {
            Ok(envelopes) => envelopes.into_iter().map(|e| e.participant).collect(),
            Err(e) => {
                tracing::warn!("challonge participants fetch degraded to empty: {e}");
                Vec::new()
            }
        };

        let tournament = tournament
            .get("tournament")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));

        Ok(normalize(tournament, matches, participants))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

// ── Normalization ─────────────────────────────────────────────────────

/// Classify a Challonge round number into a canonical round label. Round
/// numbers outside the recognized range (including the negative ones used
/// for losers' brackets) get a synthesized `round{n}` label.
pub fn round_label(round: i64) -> String {
    match round {
        1 => "round16".to_string(),
        2 => ROUND_QUARTER.to_string(),
        3 => ROUND_SEMI.to_string(),
        4 => ROUND_FINAL.to_string(),
        n => format!("round{}", n.abs()),
    }
}

fn map_participant(p: &RawParticipant) -> TeamRef {
    // Challonge leaves `name` empty for users who registered under their
    // account handle; `display_name` carries the visible label then.
    let name = p
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .or_else(|| p.display_name.clone())
        .unwrap_or_default();
    TeamRef {
        id: p.id,
        name,
        logo_url: None,
        seed: p.seed,
    }
}

fn map_match(m: &RawMatch, participants: &HashMap<i64, TeamRef>) -> BracketMatch {
    let resolve = |id: Option<i64>| id.and_then(|id| participants.get(&id).cloned());
    let (team1_score, team2_score) = parse_score_pair(m.scores_csv.as_deref());
    let status = if m.state == "complete" {
        MatchStatus::Finished
    } else {
        MatchStatus::Pending
    };

    BracketMatch {
        id: m.id,
        round: round_label(m.round),
        match_number: m.suggested_play_order.unwrap_or(0),
        team1: resolve(m.player1_id),
        team2: resolve(m.player2_id),
        team1_score,
        team2_score,
        winner_id: m.winner_id,
        status,
    }
}

/// Pure transform from raw Challonge records to the canonical schema.
pub fn normalize(
    tournament: Value,
    matches: Vec<RawMatch>,
    raw_participants: Vec<RawParticipant>,
) -> BracketSnapshot {
    let participants: Vec<TeamRef> = raw_participants.iter().map(map_participant).collect();
    let by_id: HashMap<i64, TeamRef> =
        participants.iter().map(|t| (t.id, t.clone())).collect();

    let matches = matches.iter().map(|m| map_match(m, &by_id)).collect();

    BracketSnapshot {
        tournament,
        matches,
        participants,
    }
}
