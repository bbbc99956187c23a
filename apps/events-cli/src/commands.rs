//! Dispatch of parsed subcommands to the event service.

use domain_events::{
    CreateEvent, DateInput, EventRepository, EventResult, EventService, Pagination, TagList,
    UpdateDatetime, UpdateDatetimeByTags,
};
use tracing::instrument;

use crate::cli::{Command, PageArgs};
use crate::output::Outcome;

impl From<PageArgs> for Pagination {
    fn from(args: PageArgs) -> Self {
        Pagination {
            skip: args.skip,
            limit: args.limit,
        }
    }
}

fn date(value: String) -> DateInput {
    DateInput::Text(value)
}

#[instrument(skip(service))]
pub async fn run<R: EventRepository>(
    service: &EventService<R>,
    command: Command,
) -> EventResult<Outcome> {
    let outcome = match command {
        Command::AddEvent { start, stop, tags } => {
            let input = CreateEvent {
                start: date(start),
                stop: stop.map(date),
                tags,
            };
            Outcome::Event(service.create(input).await?)
        }
        Command::ListAllEvents { page } => Outcome::Page(service.list_all(page.into()).await?),
        Command::ListRunningEvents { page } => {
            Outcome::Page(service.list_running(page.into()).await?)
        }
        Command::SearchEvent { tags, page } => Outcome::Page(
            service
                .search_by_tags(TagList { tags }, page.into())
                .await?,
        ),
        Command::ShowEvent { event_id } => Outcome::Event(service.get_one(&event_id).await?),
        Command::DeleteEvent {
            event_id,
            force_delete,
        } => Outcome::Deleted(service.delete_one(&event_id, force_delete).await?),
        Command::DeleteAllEvents { force_delete } => {
            Outcome::DeletedAll(service.delete_all(force_delete).await?)
        }
        Command::UpdateEventTags {
            event_id,
            tags,
            replace,
        } => Outcome::Event(
            service
                .update_tags(&event_id, TagList { tags }, replace)
                .await?,
        ),
        Command::UpdateEventDatetime {
            event_id,
            start,
            stop,
        } => {
            let input = UpdateDatetime {
                start: date(start),
                stop: stop.map(date),
            };
            Outcome::Event(service.update_datetime(&event_id, input).await?)
        }
        Command::UpdateEventsDatetime { tags, start, stop } => {
            let input = UpdateDatetimeByTags {
                tags,
                start: date(start),
                stop: stop.map(date),
            };
            Outcome::BulkUpdated(service.update_datetime_by_tags(input).await?)
        }
    };
    Ok(outcome)
}
