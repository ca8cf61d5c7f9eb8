use crate::roster::ColumnLabels;
use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "gradesd", version, about = "Grade roster ingestion service")]
pub struct Args {
    /// Path of the SQLite grades store
    #[arg(long, env = "GRADES_DB", default_value = "grades.sqlite3")]
    pub db: PathBuf,
    /// Address to bind the HTTP server to
    #[arg(long, env = "GRADES_BIND", default_value = "127.0.0.1:8000")]
    pub bind: String,
    /// Seconds a connection waits on a locked store before failing
    #[arg(long, env = "GRADES_BUSY_TIMEOUT_SECS", default_value_t = 30)]
    pub busy_timeout_secs: u64,
    /// Largest accepted request body, in bytes
    #[arg(long, env = "GRADES_MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,
    /// Expected CSV header labels: date;group;full name;grade
    #[arg(long, env = "GRADES_COLUMN_LABELS", default_value = "Дата;Номер группы;ФИО;Оценка")]
    pub column_labels: String,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    pub bind: SocketAddr,
    pub busy_timeout: Duration,
    pub max_upload_bytes: usize,
    pub column_labels: ColumnLabels,
}

impl ServiceConfig {
    pub fn from_args(args: Args) -> anyhow::Result<ServiceConfig> {
        let bind: SocketAddr = args
            .bind
            .parse()
            .with_context(|| format!("invalid bind address: {}", args.bind))?;
        let column_labels: ColumnLabels = args
            .column_labels
            .parse()
            .context("invalid --column-labels")?;
        anyhow::ensure!(args.max_upload_bytes > 0, "--max-upload-bytes must be positive");
        Ok(ServiceConfig {
            db_path: args.db,
            bind,
            busy_timeout: Duration::from_secs(args.busy_timeout_secs),
            max_upload_bytes: args.max_upload_bytes,
            column_labels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve() {
        let args = Args::try_parse_from(["gradesd"]).expect("parse args");
        let cfg = ServiceConfig::from_args(args).expect("config");
        assert_eq!(cfg.bind.port(), 8000);
        assert_eq!(cfg.busy_timeout, Duration::from_secs(30));
        assert_eq!(cfg.column_labels, ColumnLabels::default());
    }

    #[test]
    fn custom_labels_and_bad_bind() {
        let args = Args::try_parse_from([
            "gradesd",
            "--column-labels",
            "Date; Group ;Name;Grade",
            "--bind",
            "127.0.0.1:0",
        ])
        .expect("parse args");
        let cfg = ServiceConfig::from_args(args).expect("config");
        assert_eq!(cfg.column_labels.group, "Group");

        let args = Args::try_parse_from(["gradesd", "--bind", "nowhere"]).expect("parse args");
        assert!(ServiceConfig::from_args(args).is_err());

        let args =
            Args::try_parse_from(["gradesd", "--column-labels", "a;b;c"]).expect("parse args");
        assert!(ServiceConfig::from_args(args).is_err());
    }
}
