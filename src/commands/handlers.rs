//! Console command handlers

use std::path::Path;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::{
    state::AppState,
    storage::{Category, NotePad},
    theme::ThemeId,
};
use super::{
    responses::{timer_line, Reply, StatusResponse},
    help_text, Command, NoteAction, TaskAction,
};

/// Apply one console command to the application state
pub async fn handle_command(state: &AppState, command: Command) -> Result<Reply, String> {
    match command {
        Command::Start => timer_reply(state, "start", |engine| engine.start()),
        Command::Pause => timer_reply(state, "pause", |engine| engine.pause()),
        Command::Toggle => timer_reply(state, "toggle", |engine| engine.toggle()),
        Command::Reset => timer_reply(state, "reset", |engine| engine.reset()),
        Command::Break => timer_reply(state, "break", |engine| engine.set_break_phase(true)),
        Command::Duration { minutes } => duration_handler(state, &minutes),
        Command::Theme { id } => theme_handler(state, id.as_deref()),
        Command::Themes => Ok(Reply::message(
            ThemeId::all()
                .iter()
                .map(|theme| format!("{:<8} {}", theme.as_str(), theme.palette().background.css()))
                .collect::<Vec<_>>()
                .join("\n"),
        )),
        Command::Upload { path } => upload_handler(state, &path.join(" ")).await,
        Command::DefaultSound => {
            state.with_sound("default-sound", |sound| sound.clear_custom_sound())?;
            sound_reply(state)
        }
        Command::Play => {
            let played = state.with_sound("play", |sound| sound.play())?;
            if played {
                Ok(Reply::Silent)
            } else {
                Ok(Reply::message("Sound could not be played (see log)"))
            }
        }
        Command::Volume { percent } => volume_handler(state, percent.as_deref()),
        Command::VolumeUp => {
            state.with_sound("volume-up", |sound| sound.volume_up())?;
            sound_reply(state)
        }
        Command::VolumeDown => {
            state.with_sound("volume-down", |sound| sound.volume_down())?;
            sound_reply(state)
        }
        Command::Status => status_handler(state),
        Command::Note { action } => note_handler(state, action),
        Command::Task { action } => task_handler(state, action),
        Command::Help => Ok(Reply::message(help_text())),
        Command::Quit => Ok(Reply::Quit),
    }
}

fn timer_reply<F>(state: &AppState, action: &str, updater: F) -> Result<Reply, String>
where
    F: FnOnce(&mut crate::timer::TimerEngine),
{
    let timer = state.update_timer(action, updater)?;
    Ok(Reply::message(timer_line(&timer)))
}

/// Non-numeric and out-of-range input is ignored without a message
fn duration_handler(state: &AppState, minutes: &str) -> Result<Reply, String> {
    let Ok(minutes) = minutes.trim().parse::<i64>() else {
        debug!("Ignoring non-numeric duration: {:?}", minutes);
        return Ok(Reply::Silent);
    };

    let mut accepted = false;
    let timer = state.update_timer("duration", |engine| {
        accepted = engine.set_duration(minutes);
    })?;

    if accepted {
        Ok(Reply::message(timer_line(&timer)))
    } else {
        Ok(Reply::Silent)
    }
}

fn theme_handler(state: &AppState, id: Option<&str>) -> Result<Reply, String> {
    let (theme, palette) = match id {
        Some(id) => state.with_theme("theme", |theme| {
            theme.select(id);
            (theme.current(), theme.palette())
        })?,
        None => {
            let theme = state.theme.lock()
                .map_err(|e| format!("Failed to lock theme: {}", e))?;
            (theme.current(), theme.palette())
        }
    };

    Ok(Reply::message(format!(
        "Theme: {} (background {}, text {}, accent {})",
        theme,
        palette.background.css(),
        palette.text,
        palette.accent
    )))
}

async fn upload_handler(state: &AppState, path: &str) -> Result<Reply, String> {
    let path = Path::new(path);
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    match state.with_sound("upload", |sound| sound.upload_custom_sound(&file_name, &data))? {
        Ok(()) => {
            info!("Uploaded completion sound {}", file_name);
            sound_reply(state)
        }
        Err(e) => {
            warn!("Upload of {} failed: {}", file_name, e);
            Err(e)
        }
    }
}

fn volume_handler(state: &AppState, percent: Option<&str>) -> Result<Reply, String> {
    if let Some(percent) = percent {
        let Ok(percent) = percent.trim().parse::<i64>() else {
            debug!("Ignoring non-numeric volume: {:?}", percent);
            return Ok(Reply::Silent);
        };
        state.with_sound("volume", |sound| sound.set_volume(percent))?;
    }
    sound_reply(state)
}

fn sound_reply(state: &AppState) -> Result<Reply, String> {
    let sound = state.sound.lock()
        .map_err(|e| format!("Failed to lock sound: {}", e))?;
    let selection = sound.selection();
    Ok(Reply::message(format!(
        "Sound: {} ({:?}), volume {}%",
        selection.display_name, selection.source_kind, selection.volume_percent
    )))
}

fn status_handler(state: &AppState) -> Result<Reply, String> {
    let timer = state.get_timer_state().map_err(|e| {
        error!("Failed to get timer state: {}", e);
        e
    })?;
    let (theme, palette) = {
        let theme = state.theme.lock()
            .map_err(|e| format!("Failed to lock theme: {}", e))?;
        (theme.current(), theme.palette())
    };
    let sound = state.sound.lock()
        .map(|sound| sound.selection().clone())
        .map_err(|e| format!("Failed to lock sound: {}", e))?;
    let (last_action, last_action_time) = state.get_last_action();

    let status = StatusResponse {
        remaining: timer.formatted(),
        phase: timer.phase(),
        phase_label: timer.phase().label(),
        progress: timer.progress(),
        timer,
        theme,
        palette,
        sound,
        notifications_fired: state.notifications_fired()?,
        uptime: state.get_uptime(),
        last_action,
        last_action_time,
        timestamp: Utc::now(),
    };

    serde_json::to_string_pretty(&status)
        .map(Reply::Message)
        .map_err(|e| format!("Failed to serialize status: {}", e))
}

fn note_handler(state: &AppState, action: NoteAction) -> Result<Reply, String> {
    match action {
        NoteAction::Show => {
            let text = state.with_store(|store| NotePad::load(store))?;
            if text.is_empty() {
                Ok(Reply::message("(notepad is empty)"))
            } else {
                Ok(Reply::Message(text))
            }
        }
        NoteAction::Set { text } => {
            state.with_store(|store| NotePad::save(store, &text.join(" ")))??;
            Ok(Reply::message("Notepad saved"))
        }
        NoteAction::Clear => {
            state.with_store(|store| NotePad::clear(store))??;
            Ok(Reply::message("Notepad cleared"))
        }
    }
}

fn parse_category(category: Option<&str>) -> Result<Option<Category>, String> {
    category.map(str::parse::<Category>).transpose()
}

fn task_handler(state: &AppState, action: TaskAction) -> Result<Reply, String> {
    match action {
        TaskAction::Add { category, text } => {
            let category = parse_category(category.as_deref())?;
            let note = state.with_task_notes(|notes, store| notes.add(store, &text.join(" "), category))??;
            Ok(Reply::message(format!("Added note {}", note.id)))
        }
        TaskAction::Edit { id, category, text } => {
            let category = parse_category(category.as_deref())?;
            let note = state.with_task_notes(|notes, store| {
                notes.update(store, &id, &text.join(" "), category)
            })??;
            Ok(Reply::message(format!("Updated note {}", note.id)))
        }
        TaskAction::Delete { id } => {
            state.with_task_notes(|notes, store| notes.delete(store, &id))??;
            Ok(Reply::message(format!("Deleted note {}", id)))
        }
        TaskAction::List { search, category } => {
            let category = parse_category(category.as_deref())?;
            let lines = state.with_task_notes(|notes, _| {
                notes
                    .search(search.as_deref(), category)
                    .into_iter()
                    .map(|note| {
                        let category = note.category.map(|c| c.as_str()).unwrap_or("-");
                        format!(
                            "{}  [{}]  {}  ({})",
                            note.id,
                            category,
                            note.text,
                            note.last_edited.unwrap_or(note.created_at).format("%Y-%m-%d %H:%M")
                        )
                    })
                    .collect::<Vec<_>>()
            })?;

            if lines.is_empty() {
                Ok(Reply::message("(no notes)"))
            } else {
                Ok(Reply::Message(lines.join("\n")))
            }
        }
    }
}
