use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const NEW_TEAM_NAME: &str = "New team";
pub const NEW_TEAM_POSITION: i64 = 99;
pub const NEW_PLAYER_NAME: &str = "New player";
pub const SCHEDULED: &str = "scheduled";

/// Standings row from the teams table. Columns are nullable because the
/// schema is not ours and replacement writes NULL for absent fields.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub name: Option<String>,
    pub played: Option<i64>,
    pub won: Option<i64>,
    pub drawn: Option<i64>,
    pub lost: Option<i64>,
    pub goals_for: Option<i64>,
    pub goals_against: Option<i64>,
    pub goal_difference: Option<i64>,
    pub points: Option<i64>,
    /// Assigned by the client, never recomputed from points.
    pub position: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Team fields as sent by the client. Used as-is for full-row replacement;
/// absent or unreadable fields are written as NULL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeamInput {
    #[serde(deserialize_with = "lenient_int")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub played: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub won: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub drawn: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub lost: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub goals_for: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub goals_against: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub goal_difference: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub points: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub position: Option<i64>,
}

/// A team ready for insertion, with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    pub played: i64,
    pub won: i64,
    pub drawn: i64,
    pub lost: i64,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goal_difference: i64,
    pub points: i64,
    pub position: i64,
}

impl TeamInput {
    /// Defaults: name "New team", all counters 0, position 99.
    pub fn into_new_team(self) -> NewTeam {
        NewTeam {
            name: self.name.unwrap_or_else(|| NEW_TEAM_NAME.to_string()),
            played: self.played.unwrap_or(0),
            won: self.won.unwrap_or(0),
            drawn: self.drawn.unwrap_or(0),
            lost: self.lost.unwrap_or(0),
            goals_for: self.goals_for.unwrap_or(0),
            goals_against: self.goals_against.unwrap_or(0),
            goal_difference: self.goal_difference.unwrap_or(0),
            points: self.points.unwrap_or(0),
            position: self.position.unwrap_or(NEW_TEAM_POSITION),
        }
    }
}

/// Row from the matches table, as returned by insert/update
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: i64,
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub match_date: Option<NaiveDateTime>,
    pub status: Option<String>,
}

/// Match joined with both team names, for the calendar listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Fixture {
    pub id: i64,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub match_date: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub home_team_id: i64,
    pub home_team_name: Option<String>,
    pub away_team_id: i64,
    pub away_team_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchInput {
    #[serde(deserialize_with = "lenient_int")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub home_team_id: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub away_team_id: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub home_score: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub away_score: Option<i64>,
    #[serde(deserialize_with = "lenient_kickoff")]
    pub match_date: Option<NaiveDateTime>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    pub home_score: i64,
    pub away_score: i64,
    pub match_date: Option<NaiveDateTime>,
    pub status: String,
}

impl MatchInput {
    /// Defaults: scores 0, status "scheduled". Team references and the
    /// kickoff time pass through untouched.
    pub fn into_new_match(self) -> NewMatch {
        NewMatch {
            home_team_id: self.home_team_id,
            away_team_id: self.away_team_id,
            home_score: self.home_score.unwrap_or(0),
            away_score: self.away_score.unwrap_or(0),
            match_date: self.match_date,
            status: self.status.unwrap_or_else(|| SCHEDULED.to_string()),
        }
    }
}

/// Roster entry from the players table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    pub id: i64,
    pub team_id: Option<i64>,
    pub name: Option<String>,
    pub number: Option<i64>,
    pub position: Option<String>,
    pub goals: Option<i64>,
    pub assists: Option<i64>,
    pub yellow_cards: Option<i64>,
    pub red_cards: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlayerInput {
    #[serde(deserialize_with = "lenient_int")]
    pub team_id: Option<i64>,
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub number: Option<i64>,
    #[serde(deserialize_with = "lenient_text")]
    pub position: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub goals: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub assists: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub yellow_cards: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub red_cards: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    pub team_id: Option<i64>,
    pub name: String,
    pub number: i64,
    pub position: String,
    pub goals: i64,
    pub assists: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
}

impl PlayerInput {
    /// Defaults: name "New player", number 0, empty position, all stats 0.
    pub fn into_new_player(self) -> NewPlayer {
        NewPlayer {
            team_id: self.team_id,
            name: self.name.unwrap_or_else(|| NEW_PLAYER_NAME.to_string()),
            number: self.number.unwrap_or(0),
            position: self.position.unwrap_or_default(),
            goals: self.goals.unwrap_or(0),
            assists: self.assists.unwrap_or(0),
            yellow_cards: self.yellow_cards.unwrap_or(0),
            red_cards: self.red_cards.unwrap_or(0),
        }
    }
}

// Response bodies

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamsResponse {
    pub teams: Vec<Team>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamResponse {
    pub team: Option<Team>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<Fixture>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub r#match: Option<Match>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayersResponse {
    pub players: Vec<Player>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerResponse {
    pub player: Option<Player>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Parses a kickoff time in any of the shapes clients send: RFC 3339,
/// `datetime-local` input values, SQL timestamps or a bare date.
pub fn parse_kickoff(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

// Input fields never fail the request: a value of the wrong shape is
// treated as absent.

/// A JSON integer or a string holding one.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_kickoff<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => parse_kickoff(&s),
        _ => None,
    })
}
