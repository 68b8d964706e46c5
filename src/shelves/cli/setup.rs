use clap::{Args, Parser, Subcommand};
use shelves::api::{Bound, Column, DateColumn, ViewFilter};
use shelves::model::Table;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shelves", bin_name = "shelves", version)]
#[command(about = "A catalog of your books and a log of your readings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print debug logging to stderr
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Directory holding books.csv and reading.csv
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the books and reading tables
    Init {
        /// Create the tables in DIR and remember it as the data directory
        #[arg(long, value_name = "DIR")]
        path: Option<PathBuf>,

        /// Replace existing tables with empty ones
        #[arg(long)]
        force: bool,
    },

    /// Add, edit or remove an entry interactively
    Manage {
        /// Table to update: books or reading
        table: Table,
    },

    /// Print a table
    View {
        /// Table to print: books or reading
        table: Table,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show or set configuration
    Config {
        /// Config key (data-dir)
        key: Option<String>,

        /// New value
        value: Option<String>,
    },

    /// Recompute derived columns in both tables
    Doctor,
}

/// Row filters for `view`. Every given filter must hold.
#[derive(Args, Debug)]
#[command(next_help_heading = "Filters")]
pub struct FilterArgs {
    /// Only entries with this title
    #[arg(long)]
    pub title: Option<String>,

    /// Author name, or any part of it
    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    /// Lower limit such as rating=4 or times-read=2 (repeatable)
    #[arg(long, value_name = "COLUMN=VALUE")]
    pub min: Vec<Bound>,

    /// Upper limit such as length=300 or reading-time=14 (repeatable)
    #[arg(long, value_name = "COLUMN=VALUE")]
    pub max: Vec<Bound>,

    /// Reading date the date filters use: start or finish
    #[arg(long, value_name = "COLUMN", default_value = "finish")]
    pub dates_on: DateColumn,

    /// Earliest date, inclusive
    #[arg(long, value_name = "DATE", value_parser = ViewFilter::parse_date)]
    pub from: Option<chrono::NaiveDate>,

    /// Latest date, inclusive
    #[arg(long, value_name = "DATE", value_parser = ViewFilter::parse_date)]
    pub to: Option<chrono::NaiveDate>,

    #[arg(long)]
    pub year: Option<i32>,

    /// Only entries where COLUMN is empty (repeatable)
    #[arg(long, value_name = "COLUMN")]
    pub missing: Vec<Column>,
}

impl From<FilterArgs> for ViewFilter {
    fn from(args: FilterArgs) -> Self {
        ViewFilter {
            title: args.title,
            author: args.author,
            genre: args.genre,
            min: args.min,
            max: args.max,
            dates_on: args.dates_on,
            from: args.from,
            to: args.to,
            year: args.year,
            missing: args.missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_manage_table() {
        let cli = Cli::try_parse_from(["shelves", "manage", "reading"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Manage {
                table: Table::Reading
            }
        ));
    }

    #[test]
    fn rejects_unknown_table() {
        assert!(Cli::try_parse_from(["shelves", "view", "magazines"]).is_err());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "shelves",
            "view",
            "books",
            "--title",
            "Dune",
            "--data-dir",
            "/tmp/books",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/books")));
        match cli.command {
            Commands::View { table, filter } => {
                assert_eq!(table, Table::Books);
                assert_eq!(filter.title.as_deref(), Some("Dune"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn view_filters_parse() {
        let cli = Cli::try_parse_from([
            "shelves",
            "view",
            "reading",
            "--min",
            "rating=4",
            "--max",
            "reading-time=30",
            "--dates-on",
            "start",
            "--from",
            "2024-01-01",
            "--missing",
            "finish",
        ])
        .unwrap();
        let Commands::View { filter, .. } = cli.command else {
            panic!("expected view");
        };
        let filter = ViewFilter::from(filter);
        assert_eq!(filter.min[0].column, Column::Rating);
        assert_eq!(filter.max[0].value, 30.0);
        assert_eq!(filter.dates_on, DateColumn::Start);
        assert_eq!(filter.from.map(|d| d.to_string()).as_deref(), Some("2024-01-01"));
        assert_eq!(filter.missing, [Column::Finish]);
        assert!(filter.year.is_none());
    }

    #[test]
    fn bad_filters_are_usage_errors() {
        for args in [
            ["shelves", "view", "books", "--min", "genre=2"],
            ["shelves", "view", "books", "--missing", "colour"],
            ["shelves", "view", "reading", "--from", "soon"],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "{:?}", args);
        }
    }

    #[test]
    fn init_flags() {
        let cli = Cli::try_parse_from(["shelves", "init", "--path", "lib", "--force"]).unwrap();
        match cli.command {
            Commands::Init { path, force } => {
                assert_eq!(path, Some(PathBuf::from("lib")));
                assert!(force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
