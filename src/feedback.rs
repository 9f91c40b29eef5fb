//! Coaching feedback for a finished session
//!
//! Compares what was performed against what was planned and against the
//! lifter's own history, then phrases the result as a headline plus a few
//! short notes.

use serde::Serialize;
use tracing::debug;

use crate::analysis::estimate::Formula;
use crate::analysis::records::{PersonalRecord, detect_records};
use crate::analysis::streak::Streak;
use crate::analysis::trend::TrendEstimate;
use crate::progression::Prescription;
use crate::session::Session;
use crate::units::{Unit, format_weight};

const DELOAD_FAILURE_STREAK: u32 = 3;
const WARN_FAILURE_STREAK: u32 = 2;
const CELEBRATE_SUCCESS_STREAK: u32 = 3;
const BIG_AMRAP_SURPLUS: u32 = 3;
const HIGH_RPE: f64 = 9.5;
const LOW_RPE: f64 = 6.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Celebrate,
    Positive,
    Neutral,
    Caution,
    Deload,
}

impl Tone {
    pub fn emoji(&self) -> &'static str {
        match self {
            Tone::Celebrate => "🏆",
            Tone::Positive => "✅",
            Tone::Neutral => "📝",
            Tone::Caution => "⚠️",
            Tone::Deload => "🛑",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub tone: Tone,
    pub headline: String,
    pub notes: Vec<String>,
    pub records: Vec<PersonalRecord>,
    pub suggest_deload: bool,
}

impl Feedback {
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("{} {}", self.tone.emoji(), self.headline)];
        for note in &self.notes {
            lines.push(format!("  - {}", note));
        }
        lines.join("\n")
    }
}

/// Missed reps and AMRAP surplus against a plan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Shortfall {
    missed_reps: u32,
    short_sets: u32,
    amrap_surplus: Option<u32>,
}

pub struct FeedbackGenerator {
    formula: Formula,
    unit: Unit,
}

impl FeedbackGenerator {
    pub fn new(formula: Formula, unit: Unit) -> Self {
        Self { formula, unit }
    }

    /// `history` holds earlier sessions of the same exercise, oldest first
    pub fn generate(
        &self,
        session: &Session,
        history: &[Session],
        target: Option<&Prescription>,
    ) -> Feedback {
        if session.sets.is_empty() {
            return Feedback {
                tone: Tone::Neutral,
                headline: format!("No sets logged for {}", session.exercise),
                notes: Vec::new(),
                records: Vec::new(),
                suggest_deload: false,
            };
        }

        let prior: Vec<Session> = history
            .iter()
            .filter(|s| s.exercise.eq_ignore_ascii_case(&session.exercise) && s.date < session.date)
            .cloned()
            .collect();

        let shortfall = match target {
            Some(plan) => Self::against_plan(session, plan),
            None => Self::against_logged_targets(session),
        };
        let succeeded = shortfall.missed_reps == 0;

        // Streaks judge this session by the same yardstick as the headline
        let before = Streak::from_sessions(&prior);
        let streak = if succeeded {
            Streak {
                successes: if before.failures == 0 { before.successes + 1 } else { 1 },
                failures: 0,
            }
        } else {
            Streak {
                successes: 0,
                failures: if before.successes == 0 { before.failures + 1 } else { 1 },
            }
        };

        let mut timeline = prior.clone();
        timeline.push(session.clone());

        let records = detect_records(session, &prior, self.formula);
        let trend = TrendEstimate::fit(&timeline, self.formula);
        let stalled = trend.as_ref().is_some_and(TrendEstimate::is_stalled);

        let suggest_deload = streak.failures >= DELOAD_FAILURE_STREAK
            || (stalled && streak.failures >= WARN_FAILURE_STREAK);

        debug!(
            "{}: missed {} reps, streak {:?}, {} records, stalled {}",
            session.exercise,
            shortfall.missed_reps,
            streak,
            records.len(),
            stalled
        );

        let (tone, headline) = self.headline(session, &shortfall, &streak, &records);

        let mut notes = Vec::new();
        for record in &records {
            notes.push(self.record_note(record));
        }
        if let Some(surplus) = shortfall.amrap_surplus {
            if surplus >= BIG_AMRAP_SURPLUS {
                notes.push(format!(
                    "Beat the AMRAP target by {} reps; the next target will climb.",
                    surplus
                ));
            } else if surplus > 0 {
                notes.push(format!("AMRAP target beaten by {}.", surplus));
            }
        }
        if let Some(rpe) = session.average_rpe() {
            if rpe >= HIGH_RPE {
                notes.push(format!(
                    "Average RPE {}: near-max effort, prioritize recovery before the next heavy day.",
                    format_weight(rpe)
                ));
            } else if rpe <= LOW_RPE && succeeded {
                notes.push(format!(
                    "Average RPE {}: there was room left, the load can move faster.",
                    format_weight(rpe)
                ));
            }
        }
        if streak.successes >= CELEBRATE_SUCCESS_STREAK {
            notes.push(format!("{} successful sessions in a row.", streak.successes));
        }
        if streak.failures == WARN_FAILURE_STREAK {
            notes.push("Two sessions short of target; one more and a deload is due.".to_string());
        }
        if let Some(trend) = &trend {
            if stalled {
                notes.push(format!(
                    "Estimated 1RM has stalled over the last {} sessions.",
                    trend.data_points()
                ));
            } else if trend.per_week() > 0.0 {
                notes.push(format!(
                    "Estimated 1RM trending up {} {}/week.",
                    format_weight(trend.per_week()),
                    self.unit
                ));
            }
        }
        if suggest_deload && tone != Tone::Deload {
            notes.push("Consider a deload: drop the load about 10% for a week.".to_string());
        }

        Feedback { tone, headline, notes, records, suggest_deload }
    }

    fn headline(
        &self,
        session: &Session,
        shortfall: &Shortfall,
        streak: &Streak,
        records: &[PersonalRecord],
    ) -> (Tone, String) {
        if streak.failures >= DELOAD_FAILURE_STREAK {
            return (
                Tone::Deload,
                format!(
                    "Missed targets {} sessions running on {}: take a deload",
                    streak.failures, session.exercise
                ),
            );
        }
        if !records.is_empty() {
            return (Tone::Celebrate, format!("New personal record on {}!", session.exercise));
        }
        if shortfall.missed_reps == 0 {
            let top = session
                .top_set()
                .map(|s| format!(" at {} {}", format_weight(s.weight), self.unit))
                .unwrap_or_default();
            return (
                Tone::Positive,
                format!("All {} sets completed{}", session.sets.len(), top),
            );
        }
        (
            Tone::Caution,
            format!(
                "Missed {} reps across {} sets",
                shortfall.missed_reps, shortfall.short_sets
            ),
        )
    }

    fn record_note(&self, record: &PersonalRecord) -> String {
        let value = format!("{} {}", format_weight(record.value), self.unit);
        let label = record.kind.label();
        match record.previous {
            Some(previous) => format!(
                "{}: {} (previous {} {})",
                label,
                value,
                format_weight(previous),
                self.unit
            ),
            None => format!("{}: {} (first recorded)", label, value),
        }
    }

    /// Work sets are matched to performed sets by position, warm-ups are skipped
    fn against_plan(session: &Session, plan: &Prescription) -> Shortfall {
        let planned: Vec<_> = plan.work_sets().collect();
        let warmups = plan.sets.len() - planned.len();
        let performed: Vec<_> = if session.sets.len() >= plan.sets.len() {
            session.sets.iter().skip(warmups).collect()
        } else {
            session.sets.iter().collect()
        };

        let mut shortfall = Shortfall::default();
        for (i, target) in planned.iter().enumerate() {
            let reps = performed.get(i).map(|s| s.reps).unwrap_or(0);
            if reps < target.reps {
                shortfall.missed_reps += target.reps - reps;
                shortfall.short_sets += 1;
            } else if target.amrap {
                shortfall.amrap_surplus = Some(reps - target.reps);
            }
        }
        shortfall
    }

    fn against_logged_targets(session: &Session) -> Shortfall {
        Shortfall {
            missed_reps: session.missed_reps(),
            short_sets: session.sets.iter().filter(|s| !s.hit_target()).count() as u32,
            amrap_surplus: None,
        }
    }
}
