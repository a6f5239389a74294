// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::collaborators::NameNormalizer;

/// URL-safe repository names.
///
/// Lowercases, keeps ASCII alphanumerics together with `.`, `_` and `-`,
/// and collapses every other run of characters into a single `-`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlugNormalizer;

impl NameNormalizer for SlugNormalizer {
    fn normalize(&self, name: &str) -> String {
        let mut slug = String::with_capacity(name.len());
        let mut pending_dash = false;

        for ch in name.trim().chars() {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(ch.to_ascii_lowercase());
            } else {
                pending_dash = true;
            }
        }

        slug
    }
}
