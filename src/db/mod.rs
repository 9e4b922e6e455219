use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::Settings;
use crate::models::*;

/// Builds the shared pool. Connections are checked out per request and
/// returned when the request finishes.
pub async fn connect(settings: &Settings) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&settings.database_url)?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(settings.db_max_connections)
        .connect_with(options)
        .await
}

// Team queries
pub async fn get_all_teams(conn: &mut SqliteConnection) -> Result<Vec<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"SELECT id, name, played, won, drawn, lost,
                  goals_for, goals_against, goal_difference,
                  points, position, updated_at
           FROM teams
           ORDER BY position ASC"#
    )
    .fetch_all(conn)
    .await
}

pub async fn insert_team(conn: &mut SqliteConnection, team: &NewTeam) -> Result<Team, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"INSERT INTO teams (name, played, won, drawn, lost,
                              goals_for, goals_against, goal_difference,
                              points, position, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
           RETURNING id, name, played, won, drawn, lost,
                     goals_for, goals_against, goal_difference,
                     points, position, updated_at"#
    )
    .bind(&team.name)
    .bind(team.played)
    .bind(team.won)
    .bind(team.drawn)
    .bind(team.lost)
    .bind(team.goals_for)
    .bind(team.goals_against)
    .bind(team.goal_difference)
    .bind(team.points)
    .bind(team.position)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
}

/// Full-row replacement keyed on `team.id`. Returns `None` when no row matched.
pub async fn update_team(conn: &mut SqliteConnection, team: &TeamInput) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"UPDATE teams
           SET name = ?, played = ?, won = ?, drawn = ?, lost = ?,
               goals_for = ?, goals_against = ?, goal_difference = ?,
               points = ?, position = ?, updated_at = ?
           WHERE id = ?
           RETURNING id, name, played, won, drawn, lost,
                     goals_for, goals_against, goal_difference,
                     points, position, updated_at"#
    )
    .bind(&team.name)
    .bind(team.played)
    .bind(team.won)
    .bind(team.drawn)
    .bind(team.lost)
    .bind(team.goals_for)
    .bind(team.goals_against)
    .bind(team.goal_difference)
    .bind(team.points)
    .bind(team.position)
    .bind(Utc::now())
    .bind(team.id)
    .fetch_optional(conn)
    .await
}

pub async fn delete_team(conn: &mut SqliteConnection, team_id: Option<i64>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM teams WHERE id = ?"#)
        .bind(team_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

// Match queries
pub async fn get_all_fixtures(conn: &mut SqliteConnection) -> Result<Vec<Fixture>, sqlx::Error> {
    sqlx::query_as::<_, Fixture>(
        r#"SELECT
               m.id, m.home_score, m.away_score, m.match_date, m.status,
               home.id AS home_team_id, home.name AS home_team_name,
               away.id AS away_team_id, away.name AS away_team_name
           FROM matches m
           JOIN teams home ON m.home_team_id = home.id
           JOIN teams away ON m.away_team_id = away.id
           ORDER BY m.match_date DESC"#
    )
    .fetch_all(conn)
    .await
}

pub async fn insert_match(conn: &mut SqliteConnection, new_match: &NewMatch) -> Result<Match, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        r#"INSERT INTO matches (home_team_id, away_team_id, home_score, away_score, match_date, status)
           VALUES (?, ?, ?, ?, ?, ?)
           RETURNING id, home_team_id, away_team_id, home_score, away_score, match_date, status"#
    )
    .bind(new_match.home_team_id)
    .bind(new_match.away_team_id)
    .bind(new_match.home_score)
    .bind(new_match.away_score)
    .bind(new_match.match_date)
    .bind(&new_match.status)
    .fetch_one(conn)
    .await
}

/// Full-row replacement keyed on `input.id`. Returns `None` when no row matched.
pub async fn update_match(conn: &mut SqliteConnection, input: &MatchInput) -> Result<Option<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        r#"UPDATE matches
           SET home_team_id = ?, away_team_id = ?, home_score = ?,
               away_score = ?, match_date = ?, status = ?
           WHERE id = ?
           RETURNING id, home_team_id, away_team_id, home_score, away_score, match_date, status"#
    )
    .bind(input.home_team_id)
    .bind(input.away_team_id)
    .bind(input.home_score)
    .bind(input.away_score)
    .bind(input.match_date)
    .bind(&input.status)
    .bind(input.id)
    .fetch_optional(conn)
    .await
}

pub async fn delete_match(conn: &mut SqliteConnection, match_id: Option<i64>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM matches WHERE id = ?"#)
        .bind(match_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

// Player queries
pub async fn get_all_players(conn: &mut SqliteConnection) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"SELECT id, team_id, name, number, position, goals, assists, yellow_cards, red_cards
           FROM players
           ORDER BY team_id, number ASC"#
    )
    .fetch_all(conn)
    .await
}

pub async fn get_team_players(conn: &mut SqliteConnection, team_id: i64) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"SELECT id, team_id, name, number, position, goals, assists, yellow_cards, red_cards
           FROM players
           WHERE team_id = ?
           ORDER BY number ASC"#
    )
    .bind(team_id)
    .fetch_all(conn)
    .await
}

pub async fn insert_player(conn: &mut SqliteConnection, player: &NewPlayer) -> Result<Player, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"INSERT INTO players (team_id, name, number, position, goals, assists, yellow_cards, red_cards)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)
           RETURNING id, team_id, name, number, position, goals, assists, yellow_cards, red_cards"#
    )
    .bind(player.team_id)
    .bind(&player.name)
    .bind(player.number)
    .bind(&player.position)
    .bind(player.goals)
    .bind(player.assists)
    .bind(player.yellow_cards)
    .bind(player.red_cards)
    .fetch_one(conn)
    .await
}

pub async fn delete_player(conn: &mut SqliteConnection, player_id: Option<i64>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM players WHERE id = ?"#)
        .bind(player_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}
