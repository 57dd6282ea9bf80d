//! Synchronization controller update handlers
//!
//! Every focus change, edit and refresh issues a new generation for the
//! buffer. Earlier extractions keep running, but their results no longer match
//! the last issued generation and are dropped on arrival, so publications
//! follow "last issued wins" no matter what order extractions complete in.

use crate::commands::Cmd;
use crate::error::OutlineError;
use crate::extract::ExtractionRequest;
use crate::messages::OutlineMsg;
use crate::model::{CurrentBuffer, OutlineModel, SyncState};
use crate::outline::OutlineSnapshot;

/// Handle a controller message
pub fn update_outline(model: &mut OutlineModel, msg: OutlineMsg) -> Option<Cmd> {
    match msg {
        OutlineMsg::BufferFocused {
            buffer,
            language,
            content,
        } => {
            let switched = model
                .current
                .as_ref()
                .is_some_and(|current| current.id != buffer);
            let cleared = if switched { model.release() } else { None };

            model.current = Some(CurrentBuffer {
                id: buffer,
                language,
                content,
            });
            let issued = issue_extraction(model)?;

            match cleared {
                Some(old) => Some(Cmd::batch(vec![Cmd::Clear { buffer: old }, issued])),
                None => Some(issued),
            }
        }

        OutlineMsg::BufferEdited { buffer, content } => {
            let current = model.current.as_mut()?;
            if current.id != buffer {
                tracing::trace!("Ignoring edit to non-current buffer {}", buffer);
                return None;
            }
            current.content = content;
            issue_extraction(model)
        }

        OutlineMsg::Refresh => {
            if model.current.is_none() {
                tracing::debug!("Refresh with no current buffer");
                return None;
            }
            issue_extraction(model)
        }

        OutlineMsg::BufferClosed { buffer } => {
            if model.current.as_ref().map(|c| &c.id) != Some(&buffer) {
                tracing::trace!("Ignoring close of non-current buffer {}", buffer);
                return None;
            }
            let buffer = model.release()?;
            tracing::debug!("Released closed buffer {}", buffer);
            Some(Cmd::Clear { buffer })
        }

        OutlineMsg::EditorLostFocus => {
            let buffer = model.release()?;
            tracing::debug!("Released buffer {} on focus loss", buffer);
            Some(Cmd::Clear { buffer })
        }

        OutlineMsg::ExtractionCompleted {
            buffer,
            generation,
            roots,
        } => {
            if !model.is_current(&buffer, generation) {
                let err = OutlineError::StaleResult {
                    current: model.generation(&buffer),
                    buffer,
                    generation,
                };
                tracing::debug!("{}", err);
                return None;
            }

            tracing::debug!(
                "Accepted outline for {} generation {} ({} roots)",
                buffer,
                generation,
                roots.len()
            );
            accept(
                model,
                OutlineSnapshot {
                    buffer,
                    generation,
                    roots,
                },
            )
        }
    }
}

/// Issue a new generation for the current buffer
///
/// Unsupported languages never reach the provider: the empty outline is
/// accepted under the new generation right away.
fn issue_extraction(model: &mut OutlineModel) -> Option<Cmd> {
    let (buffer, language, content) = {
        let current = model.current.as_ref()?;
        (
            current.id.clone(),
            current.language.clone(),
            current.content.clone(),
        )
    };
    let generation = model.next_generation(&buffer);

    if !model.allowlist.is_supported(&language) {
        let err = OutlineError::UnsupportedSource {
            buffer: buffer.clone(),
            language,
        };
        tracing::debug!("{}, publishing empty outline", err);
        return accept(model, OutlineSnapshot::empty(buffer, generation));
    }

    tracing::debug!("Issuing extraction for {} generation {}", buffer, generation);
    model.state = SyncState::Extracting { generation };
    Some(Cmd::RunExtraction(ExtractionRequest {
        buffer,
        language,
        content,
        generation,
    }))
}

fn accept(model: &mut OutlineModel, snapshot: OutlineSnapshot) -> Option<Cmd> {
    let cmd = Cmd::Publish {
        buffer: snapshot.buffer.clone(),
        generation: snapshot.generation,
    };
    model.state = SyncState::HasSnapshot {
        generation: snapshot.generation,
    };
    model.snapshot = Some(snapshot);
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{LanguageAllowlist, LanguagePolicy};
    use crate::outline::{BufferId, OutlineRange, StructureKind, StructureNode};

    fn model() -> OutlineModel {
        OutlineModel::new(LanguageAllowlist::default())
    }

    fn roots(name: &str) -> Vec<StructureNode> {
        vec![StructureNode::new(
            name,
            StructureKind::Function,
            OutlineRange::on_line(0, 0, 4),
        )]
    }

    fn completed(buffer: &str, generation: u64, name: &str) -> OutlineMsg {
        OutlineMsg::ExtractionCompleted {
            buffer: BufferId::new(buffer),
            generation,
            roots: roots(name),
        }
    }

    fn request(cmd: Option<Cmd>) -> ExtractionRequest {
        match cmd {
            Some(Cmd::RunExtraction(request)) => request,
            other => panic!("expected RunExtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_focus_issues_generation_one() {
        let mut model = model();
        let req = request(update_outline(
            &mut model,
            OutlineMsg::focused("a.ts", "typescript", "let x = 1;"),
        ));

        assert_eq!(req.generation, 1);
        assert_eq!(req.content, "let x = 1;");
        assert_eq!(model.state(), SyncState::Extracting { generation: 1 });
    }

    #[test]
    fn test_late_result_never_regresses() {
        let mut model = model();
        update_outline(&mut model, OutlineMsg::focused("a.ts", "typescript", "v1"));
        update_outline(&mut model, OutlineMsg::edited("a.ts", "v2"));

        let cmd = update_outline(&mut model, completed("a.ts", 2, "second"));
        assert_eq!(
            cmd,
            Some(Cmd::Publish {
                buffer: BufferId::new("a.ts"),
                generation: 2
            })
        );
        assert_eq!(model.state(), SyncState::HasSnapshot { generation: 2 });

        assert_eq!(update_outline(&mut model, completed("a.ts", 1, "first")), None);
        assert_eq!(model.state(), SyncState::HasSnapshot { generation: 2 });
        assert_eq!(model.snapshot().map(|s| s.roots[0].name.as_str()), Some("second"));
    }

    #[test]
    fn test_result_for_other_buffer_is_dropped() {
        let mut model = model();
        update_outline(&mut model, OutlineMsg::focused("a.ts", "typescript", ""));
        let cmd = update_outline(&mut model, OutlineMsg::focused("b.ts", "typescript", ""));
        let clear = Cmd::Clear {
            buffer: BufferId::new("a.ts"),
        };
        assert!(matches!(&cmd, Some(Cmd::Batch(cmds)) if cmds[0] == clear));

        assert_eq!(update_outline(&mut model, completed("a.ts", 1, "stale")), None);
        assert!(update_outline(&mut model, completed("b.ts", 1, "fresh")).is_some());
    }

    #[test]
    fn test_unsupported_language_publishes_empty() {
        let allowlist = LanguageAllowlist::new(LanguagePolicy::Minimal, Vec::new());
        let mut model = OutlineModel::new(allowlist);
        let cmd = update_outline(
            &mut model,
            OutlineMsg::focused("a.py", "python", "def f(): pass"),
        );

        assert_eq!(
            cmd,
            Some(Cmd::Publish {
                buffer: BufferId::new("a.py"),
                generation: 1
            })
        );
        assert!(!cmd.is_some_and(|c| c.starts_extraction()));
        assert!(model.snapshot().is_some_and(OutlineSnapshot::is_empty));
    }

    #[test]
    fn test_edit_to_other_buffer_is_ignored() {
        let mut model = model();
        update_outline(&mut model, OutlineMsg::focused("a.ts", "typescript", "a"));
        assert_eq!(update_outline(&mut model, OutlineMsg::edited("b.ts", "b")), None);
        assert_eq!(model.generation(&BufferId::new("a.ts")), 1);
        assert_eq!(model.generation(&BufferId::new("b.ts")), 0);
    }

    #[test]
    fn test_close_then_reopen_rejects_old_results() {
        let mut model = model();
        update_outline(&mut model, OutlineMsg::focused("a.ts", "typescript", "a"));
        assert_eq!(
            update_outline(&mut model, OutlineMsg::closed("a.ts")),
            Some(Cmd::Clear {
                buffer: BufferId::new("a.ts")
            })
        );
        assert_eq!(model.state(), SyncState::Idle);

        let req = request(update_outline(
            &mut model,
            OutlineMsg::focused("a.ts", "typescript", "a"),
        ));
        assert_eq!(req.generation, 2);
        assert_eq!(update_outline(&mut model, completed("a.ts", 1, "old")), None);
    }

    #[test]
    fn test_lost_focus_releases() {
        let mut model = model();
        assert_eq!(update_outline(&mut model, OutlineMsg::EditorLostFocus), None);

        update_outline(&mut model, OutlineMsg::focused("a.ts", "typescript", "a"));
        update_outline(&mut model, completed("a.ts", 1, "f"));
        assert!(update_outline(&mut model, OutlineMsg::EditorLostFocus).is_some());
        assert!(model.snapshot().is_none());
        assert_eq!(update_outline(&mut model, completed("a.ts", 1, "f")), None);
    }

    #[test]
    fn test_refresh_reuses_content() {
        let mut model = model();
        assert_eq!(update_outline(&mut model, OutlineMsg::Refresh), None);

        update_outline(&mut model, OutlineMsg::focused("a.ts", "typescript", "original"));
        update_outline(&mut model, OutlineMsg::edited("a.ts", "edited"));
        let req = request(update_outline(&mut model, OutlineMsg::Refresh));
        assert_eq!(req.generation, 3);
        assert_eq!(req.content, "edited");
    }

    #[test]
    fn test_close_of_other_buffer_is_ignored() {
        let mut model = model();
        update_outline(&mut model, OutlineMsg::focused("a.ts", "typescript", "a"));
        assert_eq!(update_outline(&mut model, OutlineMsg::closed("b.ts")), None);
        assert!(model.current().is_some());
    }
}
