#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::time::Duration;

use skilldocs::app::{App, AppContext};
use skilldocs::config::SiteConfig;
use skilldocs::events::{AppEvent, Notification};
use skilldocs::prefs::PreferenceStore;
use tempfile::TempDir;
use tokio::sync::{broadcast, mpsc};

pub const MANIFEST: &str = r#"{
    "generated": "2026-01-15T10:30:00Z",
    "skills": [
        {
            "slug": "sf",
            "name": "Salesforce",
            "folder": "Salesforce",
            "order": 1,
            "topics": [
                {
                    "slug": "admin",
                    "name": "Admin",
                    "folder": "Admin",
                    "order": 1,
                    "articles": [
                        {"slug": "user-management", "file": "user-management", "title": "User Management in Salesforce"},
                        {"slug": "gone", "file": "gone", "title": "Deleted Article"}
                    ]
                },
                {
                    "slug": "dev",
                    "name": "Development",
                    "folder": "02-development",
                    "order": 2,
                    "articles": [
                        {"slug": "apex-basics", "file": "apex", "title": "Apex Programming Basics"}
                    ]
                }
            ]
        },
        {
            "slug": "fe",
            "name": "Frontend",
            "folder": "Frontend",
            "order": 2,
            "topics": [
                {
                    "slug": "js",
                    "name": "JavaScript",
                    "folder": "JavaScript",
                    "articles": [
                        {"slug": "async-await", "file": "async-await", "title": "Async/Await in JavaScript"}
                    ]
                }
            ]
        }
    ]
}"#;

pub const USER_MANAGEMENT: &str = "\
---
title: User Management in Salesforce
author: Jo Admin
difficulty: beginner
tags: admin, users
---

# User Management

## Creating Users

Go to **Setup**.

## Profiles

<script>alert('x')</script>

[Danger](javascript:alert(1))
";

pub const APEX: &str = "\
# Apex Programming Basics

## Variables

## Classes

### Constructors
";

pub const ASYNC_AWAIT: &str = "Promises without headings.\n";

pub const USER_MANAGEMENT_PATH: &str = "content/Salesforce/Admin/user-management.md";
pub const APEX_PATH: &str = "content/Salesforce/02-development/apex.md";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create content directory");
    }
    fs::write(path, content).expect("Failed to write site file");
}

/// A site directory with a manifest and every article except `gone`.
pub fn site() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write(dir.path(), "manifest.json", MANIFEST);
    write(dir.path(), USER_MANAGEMENT_PATH, USER_MANAGEMENT);
    write(dir.path(), APEX_PATH, APEX);
    write(dir.path(), "content/Frontend/JavaScript/async-await.md", ASYNC_AWAIT);
    dir
}

/// A site directory with no manifest at all.
pub fn empty_site() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

pub struct Harness {
    pub app: App,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
    pub notifications: broadcast::Receiver<Notification>,
}

impl Harness {
    pub async fn new(site: &Path) -> Self {
        Self::with_prefs(site, PreferenceStore::in_memory()).await
    }

    pub async fn with_prefs(site: &Path, prefs: PreferenceStore) -> Self {
        let config = SiteConfig::default().with_site(Some(site.to_path_buf()), None);
        let source = config.content_source();
        let (ctx, rx) = AppContext::new(config, source, prefs);
        let app = App::new(ctx);
        let notifications = app.bus().subscribe();

        let mut harness = Self {
            app,
            rx,
            notifications,
        };
        harness.app.init().await;
        harness
    }

    pub fn dispatch(&mut self, event: AppEvent) {
        self.app.dispatch(event);
    }

    /// Wait for the next queued event without handling it.
    pub async fn next_event(&mut self) -> AppEvent {
        tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("Timed out waiting for an event")
            .expect("Event queue closed")
    }

    /// Handle the next queued event.
    pub async fn pump(&mut self) {
        let event = self.next_event().await;
        self.app.dispatch(event);
    }

    /// Navigate and handle everything up to the finished fetch.
    pub async fn open(&mut self, hash: &str) {
        self.dispatch(AppEvent::HashChanged(hash.to_string()));
        self.pump().await;
    }

    /// Every notification sent so far.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut seen = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            seen.push(notification);
        }
        seen
    }
}
