// 📤 CSV Export - Engine output as flat rows
//
// Columns are fixed per view. List-valued fields are joined with ';'.

use std::io::Write;

use csv::WriterBuilder;

use crate::calendar::CalendarItem;
use crate::custody::{CustodyMap, WeekDay};
use crate::dates::weekday_key;
use crate::entities::Task;
use crate::error::Result;
use crate::tasks::{ChildScore, TaskProgress};

/// date, weekday, responsible_party
pub fn write_custody_csv<W: Write>(map: &CustodyMap, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["date", "weekday", "responsible_party"])?;

    for (date, party) in map {
        wtr.write_record([date.to_string().as_str(), weekday_key(*date), party.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// date, weekday, bucket, responsible_party, overridden, reason
pub fn write_week_csv<W: Write>(days: &[WeekDay], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["date", "weekday", "bucket", "responsible_party", "overridden", "reason"])?;

    for day in days {
        wtr.write_record([
            day.date.to_string().as_str(),
            day.weekday.as_str(),
            day.bucket.map(|b| b.as_str()).unwrap_or(""),
            day.party.as_deref().unwrap_or(""),
            if day.overridden { "true" } else { "false" },
            day.reason.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_calendar_csv<W: Write>(items: &[CalendarItem], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record([
        "id",
        "kind",
        "date",
        "end_date",
        "start_time",
        "end_time",
        "title",
        "color",
        "child_ids",
        "location",
    ])?;

    for item in items {
        let end_date = item.end_date.map(|d| d.to_string()).unwrap_or_default();
        let child_ids = item.child_ids.as_deref().map(|ids| ids.join(";")).unwrap_or_default();

        wtr.write_record([
            item.id.as_str(),
            item.kind.as_str(),
            item.date.to_string().as_str(),
            end_date.as_str(),
            item.start_time.as_deref().unwrap_or(""),
            item.end_time.as_deref().unwrap_or(""),
            item.title.as_str(),
            item.color.as_deref().unwrap_or(""),
            child_ids.as_str(),
            item.location.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// id, title, category, created_by
pub fn write_tasks_csv<W: Write>(tasks: &[&Task], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["id", "title", "category", "created_by"])?;

    for task in tasks {
        wtr.write_record([
            task.id.as_str(),
            task.title.as_deref().unwrap_or(""),
            task.category.as_str(),
            task.created_by_party.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// child_id, date, total, completed, pending (ids joined with ';')
pub fn write_progress_csv<W: Write>(progress: &TaskProgress, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["child_id", "date", "total", "completed", "pending"])?;
    wtr.write_record([
        progress.child_id.clone(),
        progress.date.to_string(),
        progress.total.to_string(),
        progress.completed.to_string(),
        progress.pending.join(";"),
    ])?;

    wtr.flush()?;
    Ok(())
}

/// rank, child_id, points, completed_count
pub fn write_scores_csv<W: Write>(scores: &[ChildScore], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["rank", "child_id", "points", "completed_count"])?;

    for (i, score) in scores.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            score.child_id.clone(),
            score.points.to_string(),
            score.completed_count.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
