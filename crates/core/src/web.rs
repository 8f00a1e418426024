// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status records exchanged with the build/upgrade web front end.
//!
//! Field names on the wire are PascalCase to match existing payloads.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A build submitted to the CI server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BuildJob {
    #[serde(rename = "ID")]
    pub id: i32,
    pub user_name: String,
    pub patch_file_name: String,
    pub patch_file_name_short: String,
    #[serde(rename = "PatchFileURL")]
    pub patch_file_url: String,
    pub description: String,
    /// Issue addressed by this build
    #[serde(rename = "TaskID")]
    pub task_id: i32,
    pub start_time: Option<NaiveDateTime>,
    /// Seconds the CI server spent running tests
    pub duration: i32,
    pub revision: i32,
    pub xml_url: String,

    pub windows_status: String,
    pub windows_num_diffs: i32,
    #[serde(rename = "WindowsBinariesURL")]
    pub windows_binaries_url: String,
    #[serde(rename = "WindowsBuildTreeURL")]
    pub windows_build_tree_url: String,
    #[serde(rename = "WindowsDiffsURL")]
    pub windows_diffs_url: String,
    #[serde(rename = "WindowsDetailsURL")]
    pub windows_details_url: String,
    #[serde(rename = "WindowsInstallerURL")]
    pub windows_installer_url: String,
    #[serde(rename = "WindowsInstallerFullURL")]
    pub windows_installer_full_url: String,
    #[serde(rename = "Win32SFXURL")]
    pub win32_sfx_url: String,
    #[serde(rename = "Win64SFXURL")]
    pub win64_sfx_url: String,

    pub linux_status: String,
    pub linux_num_diffs: i32,
    #[serde(rename = "LinuxBinariesURL")]
    pub linux_binaries_url: String,
    #[serde(rename = "LinuxDiffsURL")]
    pub linux_diffs_url: String,
    #[serde(rename = "LinuxDetailsURL")]
    pub linux_details_url: String,

    /// Jenkins (true) or the legacy build server (false)
    pub built_on_jenkins: bool,
    /// -1 when not built on Jenkins
    #[serde(rename = "JenkinsID")]
    pub jenkins_id: i32,
}

impl BuildJob {
    /// Jenkins job ID, if this build ran on Jenkins
    pub fn jenkins_build(&self) -> Option<i32> {
        (self.built_on_jenkins && self.jenkins_id >= 0).then_some(self.jenkins_id)
    }

    /// Total diffs across platforms
    pub fn total_diffs(&self) -> i32 {
        self.windows_num_diffs + self.linux_num_diffs
    }
}

/// A released upgrade
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Upgrade {
    pub release_date: Option<NaiveDateTime>,
    // Older payloads use the lowercase spelling
    #[serde(alias = "issueNumber")]
    pub issue_number: i32,
    pub issue_title: String,
    #[serde(rename = "IssueURL")]
    pub issue_url: String,
    #[serde(rename = "ReleaseURL")]
    pub release_url: String,
}

#[cfg(test)]
#[path = "web_tests.rs"]
mod tests;
