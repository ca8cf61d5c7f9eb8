use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentTwos {
    pub full_name: String,
    pub count_twos: i64,
}

/// Students with more than three grades of 2, most twos first.
pub fn students_more_than_3_twos(conn: &Connection) -> anyhow::Result<Vec<StudentTwos>> {
    fetch_twos(
        conn,
        "SELECT full_name, COUNT(*) FILTER (WHERE grade = 2) AS count_twos
         FROM grades
         GROUP BY full_name
         HAVING COUNT(*) FILTER (WHERE grade = 2) > 3
         ORDER BY count_twos DESC, full_name ASC",
    )
}

/// Students with fewer than five grades of 2 (zero included), fewest first.
pub fn students_less_than_5_twos(conn: &Connection) -> anyhow::Result<Vec<StudentTwos>> {
    fetch_twos(
        conn,
        "SELECT full_name, COUNT(*) FILTER (WHERE grade = 2) AS count_twos
         FROM grades
         GROUP BY full_name
         HAVING COUNT(*) FILTER (WHERE grade = 2) < 5
         ORDER BY count_twos ASC, full_name ASC",
    )
}

fn fetch_twos(conn: &Connection, sql: &str) -> anyhow::Result<Vec<StudentTwos>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |r| {
            Ok(StudentTwos {
                full_name: r.get(0)?,
                count_twos: r.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
