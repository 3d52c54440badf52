use raidmeter_core::{
    prelude::*,
    view::{Dashboard, format_whole},
};
use std::fmt;

pub(crate) const WELCOME: &str = "\
Damage meter
Record your boss damage and see how it ranks.
Enter your name to start (ctrl-d to quit).";

pub(crate) const HELP: &str = "\
commands:
  set <round> <value>   enter the damage for one round (1-9, digits only)
  fill <v1> .. <v9>     enter all nine rounds at once
  clear                 discard the current input
  submit                save the entry and show your statistics
  show                  redraw the dashboard
  history               list the entries saved this session
  help                  show this list
  quit                  leave";

///
/// Screen
/// Terminal rendering of the dashboard.
///

pub(crate) struct Screen<'a>(pub(crate) &'a Dashboard);

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;

        writeln!(f, "== Damage dashboard == [{}]", view.player)?;
        if let Some(notice) = &view.notice {
            writeln!(f, "{notice}")?;
        }
        if let Some(error) = &view.error {
            writeln!(f, "error: {error}")?;
        }

        writeln!(f, "\n-- Rounds --")?;
        for (row, chunk) in view.fields.chunks(3).enumerate() {
            for (col, text) in chunk.iter().enumerate() {
                let round = row * 3 + col + 1;
                let shown = if text.is_empty() { "_" } else { text.as_str() };
                write!(f, "  {round}: {shown:>12}")?;
            }
            writeln!(f)?;
        }
        if let Some(error) = &view.form_error {
            writeln!(f, "  ! {error}")?;
        }
        let status = if view.can_submit {
            "ready to submit"
        } else {
            "fill in every round to submit"
        };
        writeln!(f, "  {status}")?;

        if let Some(card) = &view.metrics {
            writeln!(f, "\n-- Statistics --")?;
            writeln!(f, "  {:<16}{:>16}", "Total", card.total)?;
            writeln!(f, "  {:<16}{:>16}", "Average/round", card.average)?;
            writeln!(f, "  {:<16}{:>16}", "Median", card.median)?;
            writeln!(f, "  {:<16}{:>16}", "Std deviation", card.standard_deviation)?;
            writeln!(f, "  Top {}% ({})", card.top_percent(), card.tier)?;
        }

        writeln!(f, "\n-- How to use --")?;
        for line in view.instructions {
            writeln!(f, "  - {line}")?;
        }

        writeln!(f, "\n-- All entries --")?;
        writeln!(f, "  {:<16}{:>16}", "Recorded", view.population.count)?;
        writeln!(f, "  {:<16}{:>16}", "Highest", view.population.max)?;
        write!(f, "  {:<16}{:>16}", "Mean", view.population.mean)
    }
}

///
/// History
/// This session's saved entries, newest first.
///

pub(crate) struct History<'a>(pub(crate) &'a [Entry]);

impl fmt::Display for History<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "no entries saved this session");
        }

        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let rounds: Vec<String> = entry.sample.iter().map(|v| format_whole(*v)).collect();
            write!(
                f,
                "{}  total {:>12}  [{}]",
                entry.created_at.to_rfc3339(),
                format_whole(entry.total()),
                rounds.join(", ")
            )?;
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use raidmeter_core::{
        stats::{Metrics, PopulationSummary},
        view::{INSTRUCTIONS, MetricsCard, PopulationView},
    };

    fn dashboard() -> Dashboard {
        Dashboard {
            player: PlayerName::parse("Aria").unwrap(),
            fields: Default::default(),
            form_error: None,
            can_submit: false,
            notice: None,
            error: None,
            metrics: None,
            instructions: &INSTRUCTIONS,
            population: PopulationView::from_summary(&PopulationSummary::default()),
        }
    }

    #[test]
    fn fresh_dashboard_has_no_statistics() {
        let text = Screen(&dashboard()).to_string();

        assert!(text.contains("[Aria]"));
        assert!(text.contains("fill in every round"));
        assert!(!text.contains("-- Statistics --"));
        assert!(text.contains("Highest"));
    }

    #[test]
    fn submitted_dashboard_shows_the_card() {
        let mut view = dashboard();
        view.metrics = Some(MetricsCard::from_metrics(&Metrics {
            total: 90_000.0,
            average: 10_000.0,
            median: 10_000.0,
            standard_deviation: 0.0,
            percentile: 75,
        }));
        view.notice = Some("Damage entry saved successfully!".to_string());

        let text = Screen(&view).to_string();

        assert!(text.contains("90,000"));
        assert!(text.contains("Top 25% (mid)"));
        assert!(text.contains("saved successfully"));
    }

    #[test]
    fn empty_history_says_so() {
        assert_eq!(History(&[]).to_string(), "no entries saved this session");
    }

    #[test]
    fn history_lists_totals() {
        let entry = Entry {
            id: EntryId::from_parts(1, 1),
            owner_id: OwnerId::new("user_1").unwrap(),
            owner_name: PlayerName::parse("Aria").unwrap(),
            sample: Sample::new(&[1000.0; 9]).unwrap(),
            created_at: Timestamp::from_millis(0),
        };

        let text = History(&[entry]).to_string();

        assert!(text.contains("9,000"));
        assert!(text.contains("1970-01-01"));
    }
}
