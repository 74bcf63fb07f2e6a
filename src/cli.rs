// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, crate_version};

fn scope_args() -> Vec<Arg> {
    vec![
        Arg::new("date")
            .long("date")
            .help("Single day (YYYY-MM-DD); shows DBF/2DBF baselines"),
        Arg::new("from")
            .long("from")
            .requires("to")
            .help("Range start (YYYY-MM-DD)"),
        Arg::new("to")
            .long("to")
            .requires("from")
            .help("Range end, inclusive (YYYY-MM-DD)"),
        Arg::new("preset")
            .long("preset")
            .help("last-7-days|last-14-days|last-30-days|this-month|last-month"),
    ]
}

fn scope_group() -> ArgGroup {
    ArgGroup::new("scope")
        .args(["date", "from", "preset"])
        .required(true)
        .multiple(false)
}

fn filter_args() -> Vec<Arg> {
    vec![
        Arg::new("account").long("account").help("Account digit, or All"),
        Arg::new("status")
            .long("status")
            .default_value("all")
            .help("all|active|paused (pending status wins over current)"),
        Arg::new("category").long("category"),
        Arg::new("domain").long("domain"),
        Arg::new("locale").long("locale").help("e.g. us or us_en"),
        Arg::new("source_dir")
            .long("source-dir")
            .help("Read sheets from <dir>/<sheet>.csv instead of the local workbook"),
    ]
}

fn output_args() -> Vec<Arg> {
    vec![
        Arg::new("json").long("json").action(ArgAction::SetTrue),
        Arg::new("jsonl").long("jsonl").action(ArgAction::SetTrue),
    ]
}

pub fn build_cli() -> Command {
    Command::new("adpilot")
        .version(crate_version!())
        .about("ROAS reporting and ad-set budget/status control")
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("import")
                .about("Load sheet exports into the local workbook")
                .subcommand(
                    Command::new("sheet")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("path").long("path").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("view")
                .about("Performance view for a day or a date range")
                .args(scope_args())
                .group(scope_group())
                .args(filter_args())
                .args(output_args())
                .arg(
                    Arg::new("options")
                        .long("options")
                        .action(ArgAction::SetTrue)
                        .help("Print the available filter values instead of rows"),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Compute budget/status changes from a proposals CSV")
                .args(scope_args())
                .group(scope_group())
                .args(filter_args())
                .args(output_args())
                .arg(
                    Arg::new("proposals")
                        .long("proposals")
                        .required(true)
                        .help("CSV with columns: Ad Name, New Budget, New Status"),
                )
                .arg(Arg::new("apply").long("apply").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("dry_run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .requires("apply"),
                ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("view")
                    .args(scope_args())
                    .group(scope_group())
                    .args(filter_args())
                    .arg(Arg::new("format").long("format").default_value("csv"))
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Report naming and control-sheet problems")
                .arg(Arg::new("source_dir").long("source-dir")),
        )
        .subcommand(
            Command::new("config")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").long("key").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                )
                .subcommand(Command::new("get").arg(Arg::new("key").long("key").required(true)))
                .subcommand(Command::new("list")),
        )
}
