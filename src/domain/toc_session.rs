//! 目录确认会话
//!
//! 状态机：
//! ```text
//! Proposed ──confirm──▶ Confirmed ──matched──▶ Matched
//!    ▲                      │
//!    └──────reopen── Failed ◀┘ failed
//! ```
//! Failed 不会自动重试；操作者再次提交时先回到 Proposed，并带上上次未匹配的条目。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::novel::NovelId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TocSessionState {
    /// 等待操作者编辑
    Proposed { last_missing: Vec<String> },
    /// 已提交条目，正在匹配
    Confirmed { entries: String },
    Matched { chapters: usize },
    Failed { missing: Vec<String> },
}

impl TocSessionState {
    pub fn name(&self) -> &'static str {
        match self {
            TocSessionState::Proposed { .. } => "proposed",
            TocSessionState::Confirmed { .. } => "confirmed",
            TocSessionState::Matched { .. } => "matched",
            TocSessionState::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("目录会话状态 {from} 不允许执行 {action}")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub action: &'static str,
}

/// 单本小说的目录确认会话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocSession {
    novel_id: NovelId,
    start_line: usize,
    end_line: usize,
    /// 提案条目（每行一条）
    proposal: Vec<String>,
    state: TocSessionState,
    updated_at: DateTime<Utc>,
}

impl TocSession {
    pub fn propose(novel_id: NovelId, start_line: usize, end_line: usize, proposal: Vec<String>) -> Self {
        Self {
            novel_id,
            start_line,
            end_line,
            proposal,
            state: TocSessionState::Proposed {
                last_missing: Vec::new(),
            },
            updated_at: Utc::now(),
        }
    }

    fn transition(&mut self, state: TocSessionState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    fn invalid(&self, action: &'static str) -> InvalidTransition {
        InvalidTransition {
            from: self.state.name(),
            action,
        }
    }

    /// Proposed → Confirmed
    pub fn confirm(&mut self, entries: impl Into<String>) -> Result<(), InvalidTransition> {
        match self.state {
            TocSessionState::Proposed { .. } => {
                self.transition(TocSessionState::Confirmed {
                    entries: entries.into(),
                });
                Ok(())
            }
            _ => Err(self.invalid("confirm")),
        }
    }

    /// Confirmed → Matched
    pub fn mark_matched(&mut self, chapters: usize) -> Result<(), InvalidTransition> {
        match self.state {
            TocSessionState::Confirmed { .. } => {
                self.transition(TocSessionState::Matched { chapters });
                Ok(())
            }
            _ => Err(self.invalid("mark_matched")),
        }
    }

    /// Confirmed → Failed
    pub fn mark_failed(&mut self, missing: Vec<String>) -> Result<(), InvalidTransition> {
        match self.state {
            TocSessionState::Confirmed { .. } => {
                self.transition(TocSessionState::Failed { missing });
                Ok(())
            }
            _ => Err(self.invalid("mark_failed")),
        }
    }

    /// Failed → Proposed，保留未匹配条目供操作者修改
    pub fn reopen(&mut self) -> Result<(), InvalidTransition> {
        match &self.state {
            TocSessionState::Failed { missing } => {
                let last_missing = missing.clone();
                self.transition(TocSessionState::Proposed { last_missing });
                Ok(())
            }
            _ => Err(self.invalid("reopen")),
        }
    }

    /// 匹配或分章未完成时放弃本次提交，回到 Proposed
    pub fn abandon(&mut self) -> Result<(), InvalidTransition> {
        match self.state {
            TocSessionState::Confirmed { .. } => {
                self.transition(TocSessionState::Proposed {
                    last_missing: Vec::new(),
                });
                Ok(())
            }
            _ => Err(self.invalid("abandon")),
        }
    }

    // Getters
    pub fn novel_id(&self) -> &NovelId {
        &self.novel_id
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn end_line(&self) -> usize {
        self.end_line
    }

    pub fn proposal(&self) -> &[String] {
        &self.proposal
    }

    pub fn state(&self) -> &TocSessionState {
        &self.state
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TocSession {
        TocSession::propose(NovelId::new(), 3, 5, vec!["一 出発".to_string()])
    }

    #[test]
    fn test_happy_path() {
        let mut s = session();
        s.confirm("一 出発").unwrap();
        assert_eq!(s.state().name(), "confirmed");
        s.mark_matched(2).unwrap();
        assert_eq!(s.state(), &TocSessionState::Matched { chapters: 2 });
    }

    #[test]
    fn test_failed_returns_to_proposed_with_missing() {
        let mut s = session();
        s.confirm("三 终章").unwrap();
        s.mark_failed(vec!["三 终章".to_string()]).unwrap();

        // 失败后不能直接再次确认
        assert!(s.confirm("三 终章").is_err());

        s.reopen().unwrap();
        assert_eq!(
            s.state(),
            &TocSessionState::Proposed {
                last_missing: vec!["三 终章".to_string()]
            }
        );
        assert!(s.confirm("三、终章").is_ok());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut s = session();
        let err = s.mark_matched(1).unwrap_err();
        assert_eq!(err.from, "proposed");
        assert!(s.reopen().is_err());

        s.confirm("x").unwrap();
        s.mark_matched(1).unwrap();
        assert!(s.confirm("x").is_err());
        assert!(s.abandon().is_err());
    }
}
