use chrono::Local;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::ledger::{Period, PeriodKind};

use super::{expect_args, CommandDefinition};

const USAGE: &str = "period [month|year] [offset] [date]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "period",
        "Summarize a calendar period relative to a date (default today)",
        USAGE,
        cmd_period,
    )]
}

fn cmd_period(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 3, USAGE)?;
    context.require_templates()?;

    let kind = match args.first() {
        Some(raw) => PeriodKind::parse(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!("unknown period `{}` (month, year)", raw))
        })?,
        None => context.config.default_period,
    };
    let offset = match args.get(1) {
        Some(raw) => raw.parse::<i32>().map_err(|_| {
            CommandError::InvalidArguments(format!("invalid offset `{}`", raw))
        })?,
        None => 0,
    };
    let anchor = match args.get(2) {
        Some(raw) => context.parse_date(raw)?,
        None => Local::now().date_naive(),
    };

    let period = Period::containing(anchor, kind).offset(offset);
    let range = period.date_range();
    let (amounts, closing) = context.with_statement(|statement| {
        (statement.amounts_in(&range), statement.total_balance_at(range.end))
    });

    output::section(format!(
        "Period {} ({} to {})",
        period.label(),
        context.format_date(range.start),
        context.format_date(range.end)
    ));
    for (kind, amount) in amounts {
        output::info(format!("  {:<24} {:>12.2}", format!("{:?}", kind), amount));
    }
    output::info(format!("  {:<24} {:>12.2}", "Closing balance", closing));
    Ok(())
}
