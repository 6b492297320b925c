// Database access layer (SQLite via sqlx).

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::bracket::{BRACKET_MATCHES, SEMIFINALS};
use crate::models::{BracketMatch, MatchStatus, TeamRef, ROUND_FINAL, ROUND_QUARTER, ROUND_SEMI};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub logo_url: Option<String>,
    pub created_at: String,
}

/// Tournament settings key-value pairs, projected into the shape the
/// frontend consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentSettings {
    pub tournament_id: Option<String>,
    pub iframe_mode: bool,
}

/// Flat row shape of the matches/teams left-outer join.
#[derive(Debug, sqlx::FromRow)]
struct MatchRow {
    id: i64,
    round: String,
    match_number: i64,
    team1_score: i64,
    team2_score: i64,
    winner_id: Option<i64>,
    status: String,
    team1_id: Option<i64>,
    team1_name: Option<String>,
    team1_logo: Option<String>,
    team2_id: Option<i64>,
    team2_name: Option<String>,
    team2_logo: Option<String>,
}

impl MatchRow {
    fn into_match(self) -> BracketMatch {
        let team = |id: Option<i64>, name: Option<String>, logo: Option<String>| {
            id.map(|id| TeamRef {
                id,
                name: name.unwrap_or_default(),
                logo_url: logo,
                seed: None,
            })
        };
        BracketMatch {
            id: self.id,
            round: self.round,
            match_number: self.match_number,
            team1: team(self.team1_id, self.team1_name, self.team1_logo),
            team2: team(self.team2_id, self.team2_name, self.team2_logo),
            team1_score: self.team1_score,
            team2_score: self.team2_score,
            winner_id: self.winner_id,
            status: MatchStatus::from_str_name(&self.status),
        }
    }
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS teams (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                logo_url TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        // Team ids are deliberately not FK-enforced: the reader left-joins
        // and omits the slot when a referenced team no longer exists.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS matches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                round TEXT NOT NULL,
                match_number INTEGER NOT NULL,
                team1_id INTEGER,
                team2_id INTEGER,
                team1_score INTEGER NOT NULL DEFAULT 0,
                team2_score INTEGER NOT NULL DEFAULT 0,
                winner_id INTEGER,
                status TEXT NOT NULL DEFAULT 'pending',
                UNIQUE(round, match_number)
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        // Seed the two settings rows so updates can assume they exist.
        sqlx::query(
            "INSERT OR IGNORE INTO settings (key, value) VALUES
                ('challonge_tournament_id', NULL),
                ('challonge_iframe_mode', 'false')",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ── Team CRUD ─────────────────────────────────────────────────────

    pub async fn create_team(
        &self,
        name: &str,
        logo_url: Option<&str>,
    ) -> Result<Team, sqlx::Error> {
        let row = sqlx::query_as::<_, Team>(
            "INSERT INTO teams (name, logo_url) VALUES (?, ?) RETURNING id, name, logo_url, created_at",
        )
        .bind(name)
        .bind(logo_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// All teams in ascending id order -- the stable order the bracket
    /// generator seeds from.
    pub async fn list_teams(&self) -> Result<Vec<Team>, sqlx::Error> {
        let rows = sqlx::query_as::<_, Team>(
            "SELECT id, name, logo_url, created_at FROM teams ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn delete_team(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Bracket matches ───────────────────────────────────────────────

    /// Replace the entire bracket: discard all existing matches, then insert
    /// 4 quarterfinals with their seeded teams plus empty semifinal and
    /// final placeholders, all in one transaction. Returns the number of
    /// matches created.
    pub async fn replace_bracket(&self, pairs: &[(Team, Team)]) -> Result<usize, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM matches").execute(&mut *tx).await?;

        for (idx, (team1, team2)) in pairs.iter().enumerate() {
            sqlx::query(
                "INSERT INTO matches (round, match_number, team1_id, team2_id, status) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(ROUND_QUARTER)
            .bind((idx + 1) as i64)
            .bind(team1.id)
            .bind(team2.id)
            .bind(MatchStatus::Pending.as_str())
            .execute(&mut *tx)
            .await?;
        }

        // Later rounds start with no teams; filling them is a separate step.
        for number in 1..=SEMIFINALS as i64 {
            sqlx::query("INSERT INTO matches (round, match_number, status) VALUES (?, ?, ?)")
                .bind(ROUND_SEMI)
                .bind(number)
                .bind(MatchStatus::Pending.as_str())
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("INSERT INTO matches (round, match_number, status) VALUES (?, ?, ?)")
            .bind(ROUND_FINAL)
            .bind(1i64)
            .bind(MatchStatus::Pending.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(BRACKET_MATCHES)
    }

    /// All matches with embedded team detail, ordered for presentation:
    /// quarter, semi, final, then any unrecognized round label in insertion
    /// order, with match_number ascending within each round.
    pub async fn list_bracket_matches(&self) -> Result<Vec<BracketMatch>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT
                m.id, m.round, m.match_number,
                m.team1_score, m.team2_score, m.winner_id, m.status,
                t1.id AS team1_id, t1.name AS team1_name, t1.logo_url AS team1_logo,
                t2.id AS team2_id, t2.name AS team2_name, t2.logo_url AS team2_logo
            FROM matches m
            LEFT JOIN teams t1 ON m.team1_id = t1.id
            LEFT JOIN teams t2 ON m.team2_id = t2.id
            ORDER BY
                CASE m.round
                    WHEN 'quarter' THEN 1
                    WHEN 'semi' THEN 2
                    WHEN 'final' THEN 3
                    ELSE 4
                END,
                m.match_number,
                m.id
        "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MatchRow::into_match).collect())
    }

    // ── Settings ──────────────────────────────────────────────────────

    pub async fn get_settings(&self) -> Result<TournamentSettings, sqlx::Error> {
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(
            "SELECT key, value FROM settings WHERE key IN ('challonge_tournament_id', 'challonge_iframe_mode')",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut settings = TournamentSettings {
            tournament_id: None,
            iframe_mode: false,
        };
        for (key, value) in rows {
            match key.as_str() {
                "challonge_tournament_id" => settings.tournament_id = value,
                "challonge_iframe_mode" => {
                    settings.iframe_mode = value.as_deref() == Some("true")
                }
                _ => {}
            }
        }
        Ok(settings)
    }

    /// Update both settings keys. Values go through bind parameters; a None
    /// tournament id clears the stored value.
    pub async fn update_settings(
        &self,
        tournament_id: Option<&str>,
        iframe_mode: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE settings SET value = ?, updated_at = datetime('now') WHERE key = 'challonge_tournament_id'",
        )
        .bind(tournament_id)
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "UPDATE settings SET value = ?, updated_at = datetime('now') WHERE key = 'challonge_iframe_mode'",
        )
        .bind(if iframe_mode { "true" } else { "false" })
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
