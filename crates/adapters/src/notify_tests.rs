// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn email(to: &[&str]) -> Email {
    Email {
        to: to.iter().map(|s| s.to_string()).collect(),
        subject: "Workflow error(s) in Terra Featured Workspace Intro".into(),
        html: "<p>report</p>".into(),
    }
}

#[test]
fn sendgrid_payload_shape() {
    let notifier = SendGridNotifier::new("key", "fwt@example.org").unwrap();
    let payload = notifier.payload(&email(&["a@example.org", "b@example.org"]));
    assert_eq!(
        payload,
        json!({
            "personalizations": [{ "to": [{ "email": "a@example.org" }, { "email": "b@example.org" }] }],
            "from": { "email": "fwt@example.org" },
            "subject": "Workflow error(s) in Terra Featured Workspace Intro",
            "content": [{ "type": "text/html", "value": "<p>report</p>" }],
        })
    );
}

#[tokio::test]
async fn sendgrid_refuses_empty_recipient_list() {
    let notifier = SendGridNotifier::new("key", "fwt@example.org").unwrap();
    let err = notifier.send(&email(&[])).await.unwrap_err();
    assert!(matches!(err, NotifyError::NoRecipients));
}

#[tokio::test]
async fn fake_records_sent_emails() {
    let fake = FakeNotifyAdapter::new();
    fake.send(&email(&["a@example.org"])).await.unwrap();
    assert_eq!(fake.sent(), vec![email(&["a@example.org"])]);
}

#[tokio::test]
async fn fake_can_fail() {
    let fake = FakeNotifyAdapter::new();
    fake.fail_sends();
    assert!(fake.send(&email(&["a@example.org"])).await.is_err());
    assert!(fake.sent().is_empty());
}
