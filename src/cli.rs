// Copyright (c) AlphaVelocity.
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
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Record id")
}

fn ids_arg() -> Arg {
    Arg::new("ids")
        .required(true)
        .num_args(1..)
        .value_parser(value_parser!(i64))
        .help("One or more record ids")
}

fn month_arg() -> Arg {
    Arg::new("month").long("month").help("Month as YYYY-MM")
}

fn tx_command() -> Command {
    let fields = |cmd: Command, required: bool| {
        cmd.arg(
            Arg::new("amount")
                .long("amount")
                .required(required)
                .allow_negative_numbers(true),
        )
        .arg(Arg::new("category").long("category").required(required))
        .arg(
            Arg::new("type")
                .long("type")
                .required(required)
                .help("income|expense"),
        )
        .arg(Arg::new("date").long("date").required(required).help("YYYY-MM-DD"))
        .arg(Arg::new("description").long("description"))
    };
    Command::new("tx")
        .about("Income and expense transactions")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(month_arg())
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(fields(Command::new("add").about("Record a transaction"), true))
        .subcommand(fields(
            Command::new("edit").about("Change a transaction").arg(id_arg()),
            false,
        ))
        .subcommand(Command::new("rm").about("Delete transactions").arg(ids_arg()))
}

fn budget_command() -> Command {
    Command::new("budget")
        .about("Monthly category budgets")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("list").about("List budgets").arg(month_arg()),
        ))
        .subcommand(
            Command::new("set")
                .about("Create or replace the budget for a category and month")
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("limit").long("limit").required(true))
                .arg(month_arg().required(true))
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_parser(value_parser!(i32))
                        .help("Defaults to the year of --month"),
                ),
        )
        .subcommand(Command::new("rm").about("Delete budgets").arg(ids_arg()))
        .subcommand(json_flags(
            Command::new("status")
                .about("Spending against each budget")
                .arg(month_arg().required(true)),
        ))
}

fn category_command() -> Command {
    Command::new("category")
        .about("Transaction categories")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("list")
                .about("List categories")
                .arg(Arg::new("type").long("type").help("income|expense")),
        ))
        .subcommand(
            Command::new("add")
                .about("Add a custom category")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("income|expense"),
                )
                .arg(Arg::new("color").long("color").default_value("#64748b")),
        )
        .subcommand(Command::new("rm").about("Delete categories").arg(ids_arg()))
}

fn goal_command() -> Command {
    Command::new("goal")
        .about("Savings goals")
        .subcommand_required(true)
        .subcommand(json_flags(Command::new("list").about("List savings goals")))
        .subcommand(
            Command::new("add")
                .about("Add a savings goal")
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("target").long("target").required(true))
                .arg(Arg::new("current").long("current").default_value("0"))
                .arg(Arg::new("deadline").long("deadline").help("YYYY-MM-DD")),
        )
        .subcommand(
            Command::new("contribute")
                .about("Add to (or withdraw from) a goal's saved amount")
                .arg(id_arg())
                .arg(
                    Arg::new("amount")
                        .required(true)
                        .allow_negative_numbers(true),
                ),
        )
        .subcommand(Command::new("rm").about("Delete savings goals").arg(ids_arg()))
}

fn account_command() -> Command {
    let fields = |cmd: Command, required: bool| {
        cmd.arg(Arg::new("name").long("name").required(required))
            .arg(Arg::new("bank").long("bank").required(required))
            .arg(Arg::new("number").long("number"))
            .arg(
                Arg::new("balance")
                    .long("balance")
                    .allow_negative_numbers(true),
            )
            .arg(Arg::new("tags").long("tags").help("Comma separated"))
    };
    Command::new("account")
        .about("Bank accounts")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("list").about("List bank accounts").arg(
                Arg::new("show-numbers")
                    .long("show-numbers")
                    .action(ArgAction::SetTrue)
                    .help("Print full account numbers"),
            ),
        ))
        .subcommand(fields(Command::new("add").about("Add a bank account"), true))
        .subcommand(fields(
            Command::new("edit").about("Change a bank account").arg(id_arg()),
            false,
        ))
        .subcommand(Command::new("rm").about("Delete bank accounts").arg(ids_arg()))
        .subcommand(Command::new("total").about("Sum of all balances"))
}

fn report_command() -> Command {
    Command::new("report")
        .about("Reports and dashboard")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("cashflow").about("Income and expense per month").arg(
                Arg::new("months")
                    .long("months")
                    .value_parser(value_parser!(usize))
                    .default_value("12"),
            ),
        ))
        .subcommand(json_flags(
            Command::new("spend-by-category")
                .about("Expenses per category for a month")
                .arg(month_arg().required(true)),
        ))
        .subcommand(json_flags(
            Command::new("budgets")
                .about("Budget status for a month")
                .arg(month_arg().required(true)),
        ))
        .subcommand(json_flags(
            Command::new("goals").about("Progress of every savings goal"),
        ))
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Balances and this month at a glance")
                .arg(month_arg()),
        ))
}

pub fn build_cli() -> Command {
    Command::new("smartbudget")
        .about("Personal finance records: transactions, budgets, goals and accounts")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(tx_command())
        .subcommand(budget_command())
        .subcommand(category_command())
        .subcommand(goal_command())
        .subcommand(account_command())
        .subcommand(report_command())
        .subcommand(
            Command::new("export")
                .about("Export records to a file")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .about("Export all transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check records for inconsistencies"))
}
