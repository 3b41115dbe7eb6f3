// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Restrict to one month (defaults to the latest month in actuals)")
}

fn query_arg() -> Arg {
    Arg::new("query")
        .required(true)
        .num_args(1..)
        .value_name("QUESTION")
        .help("Question in plain English")
}

pub fn build_cli() -> Command {
    Command::new("cfo")
        .version(crate_version!())
        .about("CFO Copilot: ask questions about revenue, margin, opex, EBITDA and cash runway")
        .arg(
            Arg::new("data")
                .long("data")
                .global(true)
                .env("CFO_DATA")
                .value_name("PATH")
                .help("Directory of CSV files or a SQLite ledger database"),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"])
                .default_value("warn")
                .help("Log verbosity when RUST_LOG is not set"),
        )
        .subcommand(json_flags(
            Command::new("ask")
                .about("Answer a question with a narrative and chart data")
                .arg(query_arg()),
        ))
        .subcommand(json_flags(
            Command::new("classify")
                .about("Show how a question is understood")
                .arg(query_arg()),
        ))
        .subcommand(json_flags(
            Command::new("summary")
                .about("Monthly revenue, COGS, opex, margin and EBITDA vs budget")
                .arg(month_arg()),
        ))
        .subcommand(json_flags(
            Command::new("opex")
                .about("Opex by category vs budget")
                .arg(month_arg()),
        ))
        .subcommand(json_flags(
            Command::new("trend")
                .about("Gross margin trend over trailing months")
                .arg(
                    Arg::new("period")
                        .long("period")
                        .value_parser(["last_3_months", "last_6_months", "last_12_months"])
                        .default_value("last_3_months"),
                ),
        ))
        .subcommand(json_flags(
            Command::new("runway").about("Cash runway at the recent burn rate"),
        ))
        .subcommand(json_flags(
            Command::new("report")
                .about("Executive summary with recommendations")
                .arg(month_arg()),
        ))
        .subcommand(json_flags(
            Command::new("fx")
                .about("List exchange rates")
                .arg(month_arg()),
        ))
        .subcommand(
            Command::new("import")
                .about("Load actuals/budget/cash/fx CSV files into the ledger database")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .required(true)
                        .value_name("DIR")
                        .help("Directory holding actuals.csv, budget.csv, cash.csv, fx.csv"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write analysis tables to CSV or JSON")
                .subcommand(export_cmd("opex", "Opex breakdown").arg(month_arg()))
                .subcommand(
                    export_cmd("trend", "Gross margin trend").arg(
                        Arg::new("period")
                            .long("period")
                            .value_parser(["last_3_months", "last_6_months", "last_12_months"])
                            .default_value("last_12_months"),
                    ),
                )
                .subcommand(export_cmd("cash", "Cash balances with monthly change")),
        )
        .subcommand(Command::new("doctor").about("Check the ledger data for gaps"))
}

fn export_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["csv", "json"])
                .default_value("csv"),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .required(true)
                .value_name("PATH"),
        )
}
