// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

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

fn passcode_arg() -> Arg {
    Arg::new("passcode")
        .long("passcode")
        .required(true)
        .help("Edit-mode passcode")
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true)
}

fn catalog_args(cmd: Command, span_name: &'static str) -> Command {
    cmd.arg(passcode_arg())
        .arg(Arg::new("id").long("id").help("Replace an existing entry"))
        .arg(Arg::new("title").long("title").required(true))
        .arg(Arg::new("reward").long("reward").required(true))
        .arg(
            Arg::new(span_name)
                .long(span_name)
                .default_value("weekly")
                .help("weekly|monthly"),
        )
        .arg(
            Arg::new("days")
                .long("days")
                .required(true)
                .help("Weekdays (0=Sun..6=Sat or sun,mon,..) or days of month (1-31), comma separated"),
        )
        .arg(
            Arg::new("inactive")
                .long("inactive")
                .action(ArgAction::SetTrue)
                .help("Store the entry as retired"),
        )
}

pub fn build_cli() -> Command {
    Command::new("okane")
        .about("Household allowance ledger with chores, quests and interest")
        .version(clap::crate_version!())
        .arg(
            Arg::new("memory")
                .long("memory")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Run against the built-in sample household instead of the database"),
        )
        .subcommand(
            Command::new("init").about("Create the database").arg(
                Arg::new("seed")
                    .long("seed")
                    .action(ArgAction::SetTrue)
                    .help("Load the sample household into an empty database"),
            ),
        )
        .subcommand(
            Command::new("tx")
                .about("Deposits, withdrawals and history")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("since").long("since").help("YYYY-MM-DD"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("chart").arg(
                        Arg::new("days")
                            .long("days")
                            .value_parser(value_parser!(i64)),
                    ),
                )),
        )
        .subcommand(json_flags(
            Command::new("balance").about("Balance, next interest and payout days"),
        ))
        .subcommand(
            Command::new("work")
                .about("Scheduled chores")
                .subcommand(json_flags(Command::new("today")))
                .subcommand(Command::new("toggle").arg(id_arg()))
                .subcommand(Command::new("finish").about("Submit today's work"))
                .subcommand(Command::new("payout").about("Pay rewards of submitted days"))
                .subcommand(json_flags(Command::new("records")))
                .subcommand(json_flags(Command::new("catalog")))
                .subcommand(catalog_args(
                    Command::new("add").arg(Arg::new("note").long("note")),
                    "span",
                )),
        )
        .subcommand(
            Command::new("quest")
                .about("Quest board")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("complete").arg(id_arg()).arg(
                        Arg::new("yes")
                            .long("yes")
                            .short('y')
                            .action(ArgAction::SetTrue)
                            .help("Skip the confirmation prompt"),
                    ),
                )
                .subcommand(Command::new("undo").arg(id_arg()))
                .subcommand(catalog_args(
                    Command::new("add").arg(Arg::new("description").long("description")),
                    "frequency",
                )),
        )
        .subcommand(
            Command::new("settings")
                .about("Interest, work and quest settings")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(passcode_arg())
                        .arg(
                            Arg::new("section")
                                .long("section")
                                .required(true)
                                .help("compound_interest|work_list|quest_board"),
                        )
                        .arg(Arg::new("key").long("key").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                ),
        )
        .subcommand(
            Command::new("rollover")
                .about("Daily rollover")
                .subcommand(Command::new("check"))
                .subcommand(
                    Command::new("watch")
                        .arg(
                            Arg::new("interval-secs")
                                .long("interval-secs")
                                .value_parser(value_parser!(u64)),
                        )
                        .arg(
                            Arg::new("iterations")
                                .long("iterations")
                                .value_parser(value_parser!(u64))
                                .help("Stop after this many checks"),
                        ),
                ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions").arg(
                    Arg::new("path")
                        .long("path")
                        .required(true)
                        .help("CSV with columns title,amount,category,note"),
                ),
            ),
        )
        .subcommand(Command::new("doctor").about("Check the ledger and catalog"))
}
