//! Keyword-based intent and sub-intent classification
//!
//! Scores every intent in a declaration-ordered keyword table against the
//! lowercased message: each matching keyword contributes its length divided
//! by the message length, a collection-identifier pattern adds a fixed
//! bonus, and recent history entries add a decayed bonus per keyword match.
//! Ties resolve to the first-declared intent so classification stays
//! reproducible; a zero score falls back to `general`.

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::config::ClassifierConfig;
use crate::types::HistoryEntry;

/// Fallback intent when nothing scores
pub const GENERAL_INTENT: &str = "general";

/// Pattern for collection identifiers like `COL001`
const COLLECTION_ID_PATTERN: &str = r"COL\d+";

/// Intent that collection identifiers count toward
const COLLECTION_INTENT: &str = "collection";

/// Declaration-ordered mapping from intent label to keyword list.
/// Order is semantic: ties between equal scores resolve to the
/// earlier entry.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    entries: Vec<(String, Vec<String>)>,
}

impl KeywordTable {
    pub fn new(entries: Vec<(&str, &[&str])>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(intent, keywords)| {
                    (
                        intent.to_string(),
                        keywords.iter().map(|k| k.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    /// The museum assistant's intent keywords
    pub fn museum_defaults() -> Self {
        Self::new(vec![
            ("tour_booking", &["预约", "预订", "门票", "参观"] as &[&str]),
            (
                "qa",
                &["展览", "藏品", "历史", "介绍", "开放时间", "青铜鼎", "木乃伊"],
            ),
            ("facility", &["洗手间", "餐厅", "停车场", "寄存", "无障碍"]),
            ("feedback", &["投诉", "建议", "评价", "反馈"]),
            ("collection", &["藏品", "文物", "展品", "收藏"]),
            ("security", &["安保", "监控", "安全", "丢失"]),
            ("facility_management", &["维护", "维修", "设备", "设施"]),
            ("administration", &["审批", "报销", "请假", "会议"]),
            ("analytics", &["数据", "统计", "客流", "分析"]),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(intent, keywords)| (intent.as_str(), keywords.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, intent: &str) -> Option<usize> {
        self.entries.iter().position(|(i, _)| i == intent)
    }
}

/// Per-intent sub-intent keyword tables, declaration-ordered;
/// first sub-intent with any keyword match wins
#[derive(Debug, Clone)]
pub struct SubIntentTable {
    entries: Vec<(String, Vec<(String, Vec<String>)>)>,
}

impl SubIntentTable {
    pub fn new(entries: Vec<(&str, Vec<(&str, &[&str])>)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(intent, subs)| {
                    (
                        intent.to_string(),
                        subs.into_iter()
                            .map(|(sub, keywords)| {
                                (
                                    sub.to_string(),
                                    keywords.iter().map(|k| k.to_string()).collect(),
                                )
                            })
                            .collect(),
                    )
                })
                .collect(),
        }
    }

    /// The museum assistant's sub-intent keywords
    pub fn museum_defaults() -> Self {
        Self::new(vec![
            (
                "tour_booking",
                vec![
                    ("create", &["预约", "订票", "门票"] as &[&str]),
                    ("route", &["路线", "参观", "导览"]),
                    ("query", &["查询", "查看", "我的"]),
                    ("slots", &["时段", "时间", "可用"]),
                ],
            ),
            (
                "qa",
                vec![
                    ("collection", &["藏品", "文物", "艺术品", "展品"] as &[&str]),
                    ("exhibition", &["展览", "特展", "主题展"]),
                ],
            ),
            (
                "collection",
                vec![
                    ("list", &["藏品列表", "所有藏品", "藏品概览"] as &[&str]),
                    ("detail", &["藏品详情", "藏品信息", "查看藏品"]),
                    ("environment", &["环境监测", "温湿度", "保存环境"]),
                    ("loan", &["借展申请", "外借展品", "展品借出"]),
                    ("search", &["搜索藏品", "查找藏品"]),
                ],
            ),
        ])
    }

    /// First matching sub-intent for `intent`, scanned in declaration order
    pub fn classify(&self, message: &str, intent: &str) -> Option<String> {
        let lowered = message.to_lowercase();
        let (_, subs) = self.entries.iter().find(|(i, _)| i == intent)?;
        for (sub, keywords) in subs {
            if keywords.iter().any(|kw| lowered.contains(kw.as_str())) {
                debug!("sub-intent '{}' matched under '{}'", sub, intent);
                return Some(sub.clone());
            }
        }
        None
    }
}

/// Scores messages against the keyword table
pub struct IntentClassifier {
    table: KeywordTable,
    sub_table: SubIntentTable,
    id_pattern: Regex,
    config: ClassifierConfig,
}

impl IntentClassifier {
    /// Classifier over the museum keyword tables
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        Self::with_tables(
            KeywordTable::museum_defaults(),
            SubIntentTable::museum_defaults(),
            config,
        )
    }

    pub fn with_tables(
        table: KeywordTable,
        sub_table: SubIntentTable,
        config: ClassifierConfig,
    ) -> Result<Self> {
        let id_pattern = Regex::new(COLLECTION_ID_PATTERN)
            .context("Failed to compile collection identifier pattern")?;
        Ok(Self {
            table,
            sub_table,
            id_pattern,
            config,
        })
    }

    /// Classify a message into an intent label.
    ///
    /// Always returns a label; `general` when nothing scores.
    pub fn classify(&self, message: &str, history: &[HistoryEntry]) -> String {
        let lowered = message.to_lowercase();
        let message_chars = lowered.chars().count();
        let mut scores = vec![0.0f64; self.table.len()];

        if message_chars > 0 {
            for (idx, (_, keywords)) in self.table.iter().enumerate() {
                for keyword in keywords {
                    if lowered.contains(keyword.as_str()) {
                        scores[idx] += keyword.chars().count() as f64 / message_chars as f64;
                    }
                }
            }

            // A collection identifier in the message is a strong structural
            // signal even when no keyword matches
            if self.id_pattern.is_match(message) {
                if let Some(idx) = self.table.position(COLLECTION_INTENT) {
                    scores[idx] += self.config.pattern_bonus;
                }
            }
        }

        // Recent turns keep pulling toward their intent, fading with age
        for (age, entry) in history
            .iter()
            .rev()
            .take(self.config.history_window)
            .enumerate()
        {
            let lowered_entry = entry.content.to_lowercase();
            let bonus = self.config.history_decay / (age as f64 + 1.0);
            for (idx, (_, keywords)) in self.table.iter().enumerate() {
                for keyword in keywords {
                    if lowered_entry.contains(keyword.as_str()) {
                        scores[idx] += bonus;
                    }
                }
            }
        }

        // Strict comparison keeps the first-declared intent on ties
        let mut best_idx = None;
        let mut best_score = 0.0f64;
        for (idx, score) in scores.iter().enumerate() {
            if *score > best_score {
                best_score = *score;
                best_idx = Some(idx);
            }
        }

        match best_idx {
            Some(idx) => {
                let intent = self.table.entries[idx].0.clone();
                debug!(
                    "classified message ({} chars) as '{}' with score {:.3}",
                    message_chars, intent, best_score
                );
                intent
            }
            None => {
                debug!("no intent scored, falling back to '{}'", GENERAL_INTENT);
                GENERAL_INTENT.to_string()
            }
        }
    }

    /// Sub-intent within the already-classified intent, if any
    pub fn classify_sub(&self, message: &str, intent: &str) -> Option<String> {
        self.sub_table.classify(message, intent)
    }
}
