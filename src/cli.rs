//! Command-line driver over [`FinanceManager`].

use std::{
    env,
    io::{self, Write},
};

use chrono::{Local, NaiveDate};
use colored::Colorize;
use thiserror::Error;

use crate::{
    config::ConfigManager,
    core::{services::ServiceError, FinanceManager},
    domain::{Color, Displayable, MonthAggregate, RecordDraft, RecordId, RecordKind, RecordPatch, YearMonth},
    errors::StoreError,
    storage::JsonFileStore,
    utils,
    view::{self, format_signed, format_yen},
};

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    Usage(String),
}

pub const USAGE: &str = "Usage: kakeibo_cli <command>\n\
Commands:\n  \
month [YYYY-MM]\n  \
add <expense|income> <YYYY-MM-DD> <amount> <category> [memo]\n  \
edit <id> [--date YYYY-MM-DD] [--amount N] [--category NAME] [--memo TEXT] [--type KIND]\n  \
delete <id>\n  \
categories <expense|income> [add <name> | remove <index>]\n  \
color <expense|income> <category> <#rrggbb | rgb(r, g, b)>";

/// Entry point used by the binary: loads config, opens the JSON store, and
/// dispatches the process arguments.
pub fn run_cli() -> Result<(), CliError> {
    let config_manager = ConfigManager::new()?;
    let config = config_manager.load()?;
    utils::init_tracing_with(config.log_filter.as_deref());
    tracing::info!(config = %config_manager.path().display(), "kakeibo_cli starting");

    let store = JsonFileStore::new(Some(config_manager.data_dir(&config)))?;
    tracing::debug!(data_dir = %store.base_dir().display(), "json store opened");
    let mut manager = FinanceManager::new(Box::new(store));
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_args(env::args().skip(1), &mut manager, &mut out)
}

/// Executes one command against `manager`, writing human-readable output.
pub fn run_with_args<I, W>(args: I, manager: &mut FinanceManager, out: &mut W) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
    W: Write,
{
    let mut args = args.into_iter();
    let command = args.next().ok_or_else(usage)?;
    let rest: Vec<String> = args.collect();

    match command.as_str() {
        "month" => {
            let month = match rest.first() {
                Some(raw) => raw
                    .parse::<YearMonth>()
                    .map_err(|err| CliError::Usage(err.to_string()))?,
                None => manager.month(),
            };
            let aggregate = manager.navigate_to(month)?.clone();
            render_month(&aggregate, Local::now().date_naive(), out)?;
        }
        "add" => {
            let [kind, date, amount, category, memo @ ..] = rest.as_slice() else {
                return Err(usage());
            };
            let draft = RecordDraft::new(parse_kind(kind)?, parse_date(date)?, amount.clone(), category.clone())
                .with_memo(memo.join(" "));
            let record = manager.create_record(draft)?;
            writeln!(out, "Added record {}: {}", record.id, record.display_label())?;
        }
        "edit" => {
            let (id, flags) = rest.split_first().ok_or_else(usage)?;
            let id = parse_id(id)?;
            let patch = parse_patch(flags)?;
            if !patch.has_effect() {
                return Err(CliError::Usage("edit needs at least one field to change".into()));
            }
            let record = manager.update_record(id, patch)?;
            writeln!(out, "Updated record {}: {}", record.id, record.display_label())?;
        }
        "delete" => {
            let [id] = rest.as_slice() else {
                return Err(usage());
            };
            let id = parse_id(id)?;
            manager.delete_record(id)?;
            writeln!(out, "Deleted record {}", id)?;
        }
        "categories" => {
            let (kind, action) = rest.split_first().ok_or_else(usage)?;
            let kind = parse_kind(kind)?;
            match action {
                [] => {}
                [verb, name] if verb == "add" => manager.add_category(kind, name)?,
                [verb, index] if verb == "remove" => {
                    let index = index
                        .parse::<usize>()
                        .map_err(|_| CliError::Usage(format!("invalid index `{index}`")))?;
                    manager.remove_category(kind, index)?;
                }
                _ => return Err(usage()),
            }
            for (index, name) in manager.categories(kind).iter().enumerate() {
                writeln!(out, "{index:>3}  {name}")?;
            }
        }
        "color" => {
            let [kind, category, color] = rest.as_slice() else {
                return Err(usage());
            };
            let color: Color = color.parse().map_err(ServiceError::from)?;
            manager.set_category_color(parse_kind(kind)?, category, color)?;
            writeln!(out, "{category} → {color}")?;
        }
        _ => return Err(usage()),
    }
    Ok(())
}

/// Writes totals, the detail list, and category breakdowns for one month.
pub fn render_month<W: Write>(
    aggregate: &MonthAggregate,
    today: NaiveDate,
    out: &mut W,
) -> io::Result<()> {
    let totals = aggregate.month_totals;
    writeln!(out, "{}", view::month_label(aggregate.month).bold())?;
    writeln!(
        out,
        "収入 {}  支出 {}  収支 {}",
        format_yen(totals.income).green(),
        format_yen(totals.expense).red(),
        format!("{}円", format_signed(totals.net))
    )?;

    let grid = view::month_grid(aggregate.month, today);
    let cells = view::calendar_cells(aggregate);
    writeln!(out, "{}", view::format::WEEKDAY_LABELS.join("  "))?;
    for week in &grid.weeks {
        let line: Vec<String> = week
            .iter()
            .map(|slot| match slot {
                Some(day) => {
                    let marker = if cells.contains_key(&day.date) { "*" } else { " " };
                    let text = format!("{:>2}{}", chrono::Datelike::day(&day.date), marker);
                    if day.is_today {
                        text.underline().to_string()
                    } else {
                        text
                    }
                }
                None => "   ".to_string(),
            })
            .collect();
        writeln!(out, "{}", line.join(" "))?;
    }

    for group in view::detail_list(aggregate) {
        writeln!(out)?;
        writeln!(out, "{}", group.date_label.bold())?;
        for item in group.items {
            let amount = format!("{}{}", item.display_sign, format_yen(item.amount));
            let amount = match item.kind {
                RecordKind::Income => amount.green(),
                RecordKind::Expense => amount.red(),
            };
            writeln!(out, "  [{}] {} {} {}", item.id, item.category, item.memo, amount)?;
        }
    }

    for kind in RecordKind::ALL {
        let series = view::chart_series(aggregate.category_totals(kind));
        if series.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "{} {}", kind, format_yen(series.total()))?;
        for ((label, value), percent) in series
            .labels
            .iter()
            .zip(&series.values)
            .zip(series.percentages())
        {
            writeln!(out, "  {label:<8} {:>12} {percent:>5.1}%", format_yen(*value))?;
        }
    }
    Ok(())
}

fn usage() -> CliError {
    CliError::Usage(USAGE.to_string())
}

fn parse_kind(raw: &str) -> Result<RecordKind, CliError> {
    RecordKind::parse(raw).ok_or_else(|| CliError::Usage(format!("unknown record type `{raw}`")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CliError::Usage(format!("invalid date `{raw}`, expected YYYY-MM-DD")))
}

fn parse_id(raw: &str) -> Result<RecordId, CliError> {
    raw.parse::<i64>()
        .map(RecordId)
        .map_err(|_| CliError::Usage(format!("invalid record id `{raw}`")))
}

fn parse_patch(flags: &[String]) -> Result<RecordPatch, CliError> {
    let mut patch = RecordPatch::default();
    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| CliError::Usage(format!("missing value for `{flag}`")))?;
        match flag.as_str() {
            "--date" => patch.date = Some(parse_date(value)?),
            "--amount" => patch.amount = Some(value.clone()),
            "--category" => patch.category = Some(value.clone()),
            "--memo" => patch.memo = Some(value.clone()),
            "--type" => patch.kind = Some(parse_kind(value)?),
            other => return Err(CliError::Usage(format!("unknown flag `{other}`"))),
        }
    }
    Ok(patch)
}
