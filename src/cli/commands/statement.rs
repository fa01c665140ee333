use std::path::PathBuf;

use rust_decimal::Decimal;

use crate::cli::core::{parse_account, short_id, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::ledger::{
    relative_value, AccountId, DateRange, Kind, Occurrence, Perspective, RelativeKind,
};

use super::{expect_args, CommandDefinition};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "load",
            "Load transaction templates from a JSON file",
            "load <file>",
            cmd_load,
        ),
        CommandDefinition::new(
            "balance",
            "Show the balance as of a date",
            "balance <date> [account]",
            cmd_balance,
        ),
        CommandDefinition::new(
            "amounts",
            "Show totals per kind for a date range",
            "amounts <start> <end> [account]",
            cmd_amounts,
        ),
        CommandDefinition::new(
            "categories",
            "Show totals per category for one kind",
            "categories <start> <end> <kind> [account]",
            cmd_categories,
        ),
        CommandDefinition::new(
            "timeline",
            "List occurrences in a date range",
            "timeline <start> <end> [account]",
            cmd_timeline,
        ),
        CommandDefinition::new(
            "next",
            "Show the next occurrence for an account",
            "next <account> <date>",
            cmd_next,
        ),
    ]
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, 1, "load <file>")?;
    let path = PathBuf::from(args[0]);
    let count = context.load_from(path.clone())?;
    output::success(format!("Loaded {} templates from {}", count, path.display()));
    let overview = context.overview();
    if !overview.categories.is_empty() {
        output::info(format!("Categories: {}", overview.categories.join(", ")));
    }
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, 2, "balance <date> [account]")?;
    context.require_templates()?;
    let date = context.parse_date(args[0])?;
    let account = optional_account(args.get(1))?;
    let balance = context.with_statement(|statement| match account {
        Some(account) => statement.balance_at(account, date),
        None => statement.total_balance_at(date),
    });
    output::info(format!(
        "Balance at {}{}: {}",
        context.format_date(date),
        account_suffix(account),
        money(balance)
    ));
    Ok(())
}

fn cmd_amounts(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, 3, "amounts <start> <end> [account]")?;
    context.require_templates()?;
    let range = parse_range(context, args[0], args[1])?;
    let account = optional_account(args.get(2))?;

    let rows: Vec<(String, Decimal)> = context.with_statement(|statement| match account {
        Some(account) => statement
            .amounts_of_account_in(account, &range)
            .into_iter()
            .map(|(kind, amount)| (format!("{:?}", kind), amount))
            .collect(),
        None => statement
            .amounts_in(&range)
            .into_iter()
            .map(|(kind, amount)| (format!("{:?}", kind), amount))
            .collect(),
    });

    output::section(format!(
        "Amounts {} to {}{}",
        context.format_date(range.start),
        context.format_date(range.end),
        account_suffix(account)
    ));
    print_rows(&rows);
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "categories <start> <end> <kind> [account]";
    expect_args(args, 3, 4, usage)?;
    context.require_templates()?;
    let range = parse_range(context, args[0], args[1])?;
    let account = optional_account(args.get(3))?;

    let rows = match account {
        Some(account) => {
            let kind = RelativeKind::parse(args[2]).ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "unknown kind `{}` (credit, debit, sent, received)",
                    args[2]
                ))
            })?;
            context.with_statement(|statement| {
                statement.category_amounts_of_account_in(account, &range, kind, &[])
            })
        }
        None => {
            let kind = Kind::parse(args[2]).ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "unknown kind `{}` (credit, debit, transfer)",
                    args[2]
                ))
            })?;
            context.with_statement(|statement| statement.category_amounts_in(&range, kind, &[]))
        }
    };

    output::section(format!(
        "Categories {} to {}{}",
        context.format_date(range.start),
        context.format_date(range.end),
        account_suffix(account)
    ));
    let rows: Vec<(String, Decimal)> = rows
        .into_iter()
        .map(|(category, amount)| (uncategorized(category), amount))
        .collect();
    print_rows(&rows);
    Ok(())
}

fn cmd_timeline(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, 3, "timeline <start> <end> [account]")?;
    context.require_templates()?;
    let range = parse_range(context, args[0], args[1])?;
    let account = optional_account(args.get(2))?;
    let perspective = account.map_or(Perspective::AllAccounts, Perspective::Account);

    let lines: Vec<String> = context.with_statement(|statement| {
        let occurrences = match account {
            Some(account) => statement.transactions_of_account_in(account, &range, None, &[]),
            None => statement.transactions_in(&range, None, &[]),
        };
        occurrences
            .iter()
            .map(|occurrence| describe(context, occurrence, perspective))
            .collect()
    });

    output::section(format!("Timeline{}", account_suffix(account)));
    if lines.is_empty() {
        output::info("  (no occurrences)");
    }
    for line in lines {
        output::info(line);
    }
    Ok(())
}

fn cmd_next(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, 2, "next <account> <date>")?;
    context.require_templates()?;
    let account = parse_account(args[0])?;
    let after = context.parse_date(args[1])?;
    let line = context.with_statement(|statement| {
        statement
            .next_occurrence(account, after)
            .map(|occurrence| describe(context, &occurrence, Perspective::Account(account)))
    });
    match line {
        Some(line) => output::info(format!("Next: {}", line)),
        None => output::info("No upcoming occurrences."),
    }
    Ok(())
}

fn parse_range(context: &ShellContext, start: &str, end: &str) -> Result<DateRange, CommandError> {
    let range = DateRange::new(context.parse_date(start)?, context.parse_date(end)?);
    if range.is_empty() {
        output::warning("Start date falls after end date; nothing matches.");
    }
    Ok(range)
}

fn optional_account(arg: Option<&&str>) -> Result<Option<AccountId>, CommandError> {
    arg.map(|raw| parse_account(raw)).transpose()
}

fn account_suffix(account: Option<AccountId>) -> String {
    account
        .map(|id| format!(" for {}", short_id(id)))
        .unwrap_or_default()
}

fn describe(context: &ShellContext, occurrence: &Occurrence<'_>, perspective: Perspective) -> String {
    let repeat = occurrence.repeatability().to_string();
    let mut line = format!(
        "{}  {:>10}  {:<8} {} [{}]",
        context.format_date(occurrence.date),
        money(relative_value(occurrence, perspective)),
        format!("{:?}", occurrence.kind().tag()),
        occurrence.title(),
        uncategorized(occurrence.category().to_string()),
    );
    if !repeat.is_empty() {
        line.push_str(&format!(" ({} {})", occurrence.template.cadence.label(), repeat));
    }
    line
}

fn print_rows(rows: &[(String, Decimal)]) {
    if rows.is_empty() {
        output::info("  (nothing in range)");
        return;
    }
    for (label, amount) in rows {
        output::info(format!("  {:<24} {:>12}", label, money(*amount)));
    }
}

fn uncategorized(category: String) -> String {
    if category.is_empty() {
        "uncategorized".into()
    } else {
        category
    }
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
