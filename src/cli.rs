// Copyright (c) 2025 Tallybook contributors.
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
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Multi-user expense tracking, monthly budgets, and savings goals")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("currency").long("currency").default_value("USD")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("use")
                        .about("Set the active user")
                        .arg(Arg::new("email").required(true)),
                ),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("checking|savings|credit_card|cash|investment"),
                        )
                        .arg(Arg::new("balance").long("balance").default_value("0"))
                        .arg(Arg::new("limit").long("limit")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("kind").long("kind").required(true))
                        .arg(Arg::new("limit").long("limit")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(Arg::new("icon").long("icon").default_value(""))
                        .arg(Arg::new("color").long("color").default_value("")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(Arg::new("type").long("type")),
                ))
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("icon").long("icon").default_value(""))
                        .arg(Arg::new("color").long("color").default_value("")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("desc").long("desc").default_value(""))
                        .arg(Arg::new("receipt").long("receipt"))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("type").long("type"))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(Arg::new("search").long("search"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("desc").long("desc").default_value(""))
                        .arg(Arg::new("receipt").long("receipt"))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                )
                .subcommand(json_flags(
                    Command::new("summary")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                ))
                .subcommand(json_flags(Command::new("recent").arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize))
                        .default_value("10"),
                ))),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage monthly budgets")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        ),
                )
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("progress")
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("goal")
                .about("Manage savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("deadline").long("deadline"))
                        .arg(Arg::new("icon").long("icon").default_value("")),
                )
                .subcommand(json_flags(Command::new("list").arg(
                    Arg::new("active").long("active").action(ArgAction::SetTrue),
                )))
                .subcommand(
                    Command::new("contribute")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("deadline").long("deadline"))
                        .arg(Arg::new("icon").long("icon").default_value("")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(Arg::new("format").long("format").default_value("csv"))
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Audit ledger consistency"))
}
