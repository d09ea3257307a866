use std::path::Path;

use crate::adapter::cli::args::{GroupCommand, SettingsCommand, TokensCommand, VerifyArgs};
use crate::adapter::cli::error::ApiError;
use crate::adapter::cli::events;
use crate::adapter::cli::prompt::prompt_confirm;
use crate::adapter::cli::state::AppState;
use crate::application::service::{BatchReport, CancelHandle};
use crate::domain::error::DomainError;
use crate::domain::model::{mask_token, AccountRecord};
use crate::infrastructure::config::{loader, UserSettings};
use crate::infrastructure::import;

/// Lines to print on success, or the failure to report
pub type CommandResult = Result<Vec<String>, ApiError>;

// ====== Verification Commands ======

pub async fn verify(state: &AppState, args: VerifyArgs) -> CommandResult {
    let tokens = if args.saved {
        None
    } else {
        let tokens = collect_tokens(&args)?;
        if tokens.iter().all(|t| t.trim().is_empty()) {
            return Err(ApiError::new("Enter at least one token"));
        }
        Some(tokens)
    };

    let cancel = CancelHandle::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, finishing in-flight verifications");
                cancel.cancel();
            }
        })
    };
    let forwarder = events::start_event_forwarder(state.event_bus.clone());

    let service = &state.verification_service;
    let (report, saved) = match tokens {
        Some(tokens) => service.verify_and_store(&tokens, &cancel).await,
        None => service.verify_saved(&cancel).await,
    };

    ctrl_c.abort();
    if let Err(e) = forwarder.await {
        tracing::debug!("Progress forwarder ended abnormally: {}", e);
    }

    let mut lines = report_lines(&report);
    if let Err(e) = saved {
        lines.push(format!("Warning: failed to save tokens: {}", e));
    }
    if let Some(group) = args.group.as_deref() {
        lines.extend(add_to_group(state, group, &report.records)?);
    }
    Ok(lines)
}

fn collect_tokens(args: &VerifyArgs) -> Result<Vec<String>, ApiError> {
    let mut tokens = args.tokens.clone();
    if let Some(path) = &args.file {
        tokens.extend(import::read_token_file(path)?);
    }
    Ok(tokens)
}

fn report_lines(report: &BatchReport) -> Vec<String> {
    let mut lines: Vec<String> = report.records.iter().map(AccountRecord::display_name).collect();
    let mut summary = format!("Verified {} accounts", report.records.len());
    if report.failed > 0 {
        summary.push_str(&format!(", {} failed", report.failed));
    }
    if report.skipped > 0 {
        summary.push_str(&format!(", {} blank lines skipped", report.skipped));
    }
    if report.cancelled {
        summary.push_str(" (cancelled; saved tokens left unchanged)");
    }
    lines.push(summary);
    lines
}

fn add_to_group(state: &AppState, group: &str, records: &[AccountRecord]) -> CommandResult {
    let groups = &state.group_service;
    match groups.create_group(group) {
        Ok(()) | Err(DomainError::AlreadyExists(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let mut lines = Vec::new();
    let mut added = 0;
    for record in records {
        match groups.add_member(group, record.clone()) {
            Ok(()) => added += 1,
            Err(e @ DomainError::DuplicateMember { .. }) => lines.push(format!("Warning: {}", e)),
            Err(e) => return Err(e.into()),
        }
    }
    lines.push(format!("Added {} accounts to '{}'", added, group));
    Ok(lines)
}

// ====== Token Commands ======

pub fn tokens(state: &AppState, command: TokensCommand) -> CommandResult {
    match command {
        TokensCommand::Show => {
            let tokens = state.verification_service.saved_tokens();
            if tokens.is_empty() {
                return Ok(vec!["No saved tokens".to_string()]);
            }
            Ok(tokens
                .iter()
                .enumerate()
                .map(|(i, t)| format!("{:>3}. {}", i + 1, mask_token(t)))
                .collect())
        }
        TokensCommand::Clear { yes } => {
            if !yes && !prompt_confirm("Clear all saved tokens?", false)? {
                return Ok(vec!["Cancelled".to_string()]);
            }
            state.verification_service.clear_tokens()?;
            Ok(vec!["All saved tokens cleared".to_string()])
        }
    }
}

// ====== Group Commands ======

pub fn group(state: &AppState, command: GroupCommand) -> CommandResult {
    let groups = &state.group_service;

    match command {
        GroupCommand::Create { name } => {
            groups.create_group(&name)?;
            Ok(vec![format!("Group '{}' created", name)])
        }
        GroupCommand::Delete { name, yes } => {
            let question = format!(
                "Delete group '{}'? This removes every account in it.",
                name
            );
            if !yes && !prompt_confirm(&question, false)? {
                return Ok(vec!["Cancelled".to_string()]);
            }
            groups.delete_group(&name)?;
            Ok(vec![format!("Group '{}' deleted", name)])
        }
        GroupCommand::Add {
            group,
            username,
            name,
            id,
            token,
        } => {
            let record = AccountRecord::new(token, username.clone(), name, id);
            groups.add_member(&group, record)?;
            Ok(vec![format!("Account @{} added to '{}'", username, group)])
        }
        GroupCommand::Move { from, to, username } => {
            groups.move_member(&from, &to, &username)?;
            Ok(vec![format!(
                "Account @{} moved from '{}' to '{}'",
                username, from, to
            )])
        }
        GroupCommand::Remove {
            group,
            username,
            yes,
        } => {
            let question = format!("Remove @{} from group '{}'?", username, group);
            if !yes && !prompt_confirm(&question, false)? {
                return Ok(vec!["Cancelled".to_string()]);
            }
            groups.remove_member(&group, &username)?;
            Ok(vec![format!("Removed @{} from '{}'", username, group)])
        }
        GroupCommand::List => {
            let names = groups.list_group_names()?;
            if names.is_empty() {
                return Ok(vec!["No groups".to_string()]);
            }
            Ok(names)
        }
        GroupCommand::Members { group } => Ok(groups
            .list_members(&group)?
            .iter()
            .map(AccountRecord::display_name)
            .collect()),
        GroupCommand::Find { username } => Ok(groups.find_groups_containing(&username)?),
    }
}

// ====== Settings Commands ======

pub fn settings(path: &Path, current: &UserSettings, command: SettingsCommand) -> CommandResult {
    match command {
        SettingsCommand::Show => {
            let yaml = serde_yaml::to_string(current).map_err(anyhow::Error::from)?;
            let mut lines = vec![format!("# {}", path.display())];
            lines.extend(yaml.lines().map(str::to_string));
            Ok(lines)
        }
        SettingsCommand::Init => {
            if loader::init_user_settings(path)? {
                Ok(vec![format!("Wrote default settings to {}", path.display())])
            } else {
                Ok(vec![format!("{} already exists", path.display())])
            }
        }
        SettingsCommand::Set {
            max_threads,
            timeout,
            base_url,
            groups_path,
            tokens_path,
        } => {
            let mut updated = current.clone();
            if let Some(n) = max_threads {
                updated.batch.max_threads = n;
            }
            if let Some(secs) = timeout {
                updated.api.timeout_sec = secs;
            }
            if let Some(url) = base_url {
                updated.api.base_url = url;
            }
            if let Some(p) = groups_path {
                updated.storage.groups_path = p;
            }
            if let Some(p) = tokens_path {
                updated.storage.tokens_path = p;
            }
            let mut lines: Vec<String> = updated
                .normalize()
                .into_iter()
                .map(|notice| format!("Warning: {}", notice))
                .collect();

            loader::save_user_settings(path, &updated)?;
            lines.push(format!(
                "Settings saved to {}; they apply from the next run",
                path.display()
            ));
            Ok(lines)
        }
    }
}
