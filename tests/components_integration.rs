//! Cross-component integration tests
//!
//! These tests drive a `ToastCenter` end to end (store, scheduler, router and
//! theme together) on tokio's paused clock, so every timing assertion is
//! deterministic.

use std::collections::HashSet;
use std::time::Duration;

use futures::StreamExt;
use serde_json::json;
use tokio::time::sleep;
use tokio_test::{assert_ok, assert_pending, assert_ready_ok};

use toast_engine::center::{ToastCenter, ToastEvent};
use toast_engine::config::{EngineConfig, Settings};
use toast_engine::metrics::ExitCause;
use toast_engine::notification::{Position, Toast, ToastInput, ToastPatch, Variant};
use toast_engine::router::{Phase, SlideFrom};
use toast_engine::theme::{ThemeOverride, ThemeRegistry, VariantOverride};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn create_center() -> ToastCenter {
    ToastCenter::with_defaults().expect("runtime available")
}

// =============================================================================
// Notify / Dismiss / Patch
// =============================================================================

mod lifecycle_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ids_are_distinct_and_ordered_by_call() {
        let center = create_center();

        let ids: Vec<_> = (0..25)
            .map(|i| center.notify(ToastInput::info(format!("toast {i}"))))
            .collect();

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());

        let stored: Vec<_> = center.toasts().into_iter().map(|t| t.id).collect();
        assert_eq!(stored, ids);
    }

    #[tokio::test(start_paused = true)]
    async fn test_saved_scenario() {
        let center = create_center();
        let id = center.notify(ToastInput::success("Saved"));

        let mut value = serde_json::to_value(center.toasts()).unwrap();
        value[0].as_object_mut().unwrap().remove("createdAt");

        assert_eq!(
            value,
            json!([{
                "id": id.as_str(),
                "variant": "success",
                "title": "Saved",
                "duration": 4000,
                "dismissible": true,
                "position": "bottomRight"
            }])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_toast_present_then_exiting_then_gone() {
        let center = create_center();
        let id = center.notify(ToastInput::info("Order pulled").duration_ms(100));

        sleep(ms(50)).await;
        assert!(center.get(&id).is_some());
        assert_eq!(center.phase(&id), Some(Phase::Visible));

        sleep(ms(100)).await; // t = 150
        assert_eq!(center.phase(&id), Some(Phase::Exiting));

        sleep(ms(251)).await; // t = 401, past duration + exit delay
        assert!(center.get(&id).is_none());
        assert!(center.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_toast_stays() {
        let center = create_center();
        let id = center.notify(ToastInput::loading("Binding account").persistent());

        sleep(Duration::from_secs(3600)).await;
        assert_eq!(center.get(&id).map(|t| t.duration), Some(None));
        assert_eq!(center.phase(&id), Some(Phase::Visible));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_dismissed_at_10ms_gone_by_310ms() {
        let center = create_center();
        let input: ToastInput =
            serde_json::from_value(json!({"title": "Loading", "duration": null})).unwrap();
        let id = center.notify(input);

        sleep(ms(10)).await;
        center.dismiss(&id);

        sleep(ms(299)).await; // t = 309
        assert!(center.get(&id).is_some());
        assert_eq!(center.phase(&id), Some(Phase::Exiting));

        sleep(ms(2)).await; // t = 311
        assert!(center.get(&id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_twice_is_idempotent() {
        let center = create_center();
        let keep = center.notify(ToastInput::info("keep").persistent());
        let id = center.notify(ToastInput::info("drop").persistent());

        center.dismiss(&id);
        let after_first = center.snapshot();
        center.dismiss(&id);
        assert_eq!(center.snapshot(), after_first);

        sleep(ms(400)).await;
        let remaining: Vec<_> = center.toasts().into_iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![keep]);

        // Dismissing a purged id is a no-op as well
        let before = center.snapshot();
        center.dismiss(&id);
        assert_eq!(center.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_patch_title_changes_only_title() {
        let center = create_center();
        let first = center.notify(ToastInput::info("a"));
        let id = center.notify(
            ToastInput::warning("Low stock")
                .description("3 products below threshold")
                .position(Position::TopLeft),
        );
        let last = center.notify(ToastInput::info("c"));

        let before = center.get(&id).unwrap();
        center.patch(&id, ToastPatch::new().title("x"));
        let after = center.get(&id).unwrap();

        assert_eq!(after.title, "x");
        assert_eq!(
            Toast {
                title: before.title.clone(),
                ..after
            },
            before
        );

        let order: Vec<_> = center.toasts().into_iter().map(|t| t.id).collect();
        assert_eq!(order, vec![first, id, last]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_negative_duration_clamps_to_zero() {
        let center = create_center();
        let id = center.notify(ToastInput::error("Push failed").duration_ms(-500));

        assert_eq!(center.get(&id).unwrap().duration, Some(Duration::ZERO));

        sleep(ms(1)).await;
        assert_eq!(center.phase(&id), Some(Phase::Exiting));

        sleep(ms(300)).await;
        assert!(center.get(&id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_all() {
        let center = create_center();
        for i in 0..4 {
            center.notify(ToastInput::info(format!("t{i}")).persistent());
        }

        center.dismiss_all();
        assert!(center
            .snapshot()
            .phases
            .values()
            .all(|phase| *phase == Phase::Exiting));

        sleep(ms(301)).await;
        assert!(center.is_empty());
    }
}

// =============================================================================
// Subscription Tests
// =============================================================================

mod subscription_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_wakes_on_transition() {
        let center = create_center();
        let mut rx = center.subscribe();
        rx.borrow_and_update();

        {
            let mut changed = tokio_test::task::spawn(rx.changed());
            assert_pending!(changed.poll());

            center.notify(ToastInput::success("Synced"));
            assert!(changed.is_woken());
            assert_ready_ok!(changed.poll());
        }

        assert_eq!(rx.borrow_and_update().toasts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_follow_lifecycle_order() {
        let center = create_center();
        let mut events = center.events();

        let id = center.notify(ToastInput::info("Products pushed").duration_ms(50));
        sleep(ms(400)).await;

        let mut received = Vec::new();
        while let Ok(event) = events.try_recv() {
            received.push(event);
        }

        assert_eq!(
            received,
            vec![
                ToastEvent::Added(id.clone()),
                ToastEvent::Settled(id.clone()),
                ToastEvent::ExitStarted {
                    id: id.clone(),
                    cause: ExitCause::Expired
                },
                ToastEvent::Removed(id),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_yields_current_then_updates() {
        let center = create_center();
        center.notify(ToastInput::info("first").persistent());

        let mut stream = center.stream();
        let current = stream.next().await.unwrap();
        assert_eq!(current.toasts().len(), 1);

        center.notify(ToastInput::info("second").persistent());
        let next = stream.next().await.unwrap();
        assert_eq!(next.toasts().len(), 2);
        assert!(next.revision > current.revision);
    }

    #[tokio::test(start_paused = true)]
    async fn test_patch_unknown_id_does_not_publish() {
        let center = create_center();
        center.notify(ToastInput::info("a").persistent());
        let before = center.snapshot().revision;

        center.patch(
            &toast_engine::ToastId::from("missing"),
            ToastPatch::new().title("x"),
        );
        assert_eq!(center.snapshot().revision, before);
    }
}

// =============================================================================
// Routing Tests
// =============================================================================

mod routing_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_layout_groups_by_position() {
        let center = create_center();
        let a = center.notify(ToastInput::info("a").position(Position::Top));
        let b = center.notify(ToastInput::info("b"));
        let c = center.notify(ToastInput::info("c").position(Position::Top));
        let d = center.notify(ToastInput::info("d").position(Position::BottomLeft));

        let layout = center.layout();
        let top = layout.group(Position::Top).unwrap();
        let top_ids: Vec<_> = top.toasts.iter().map(|r| r.toast.id.clone()).collect();
        assert_eq!(top_ids, vec![a, c]);
        assert!(top.toasts.iter().all(|r| r.slide_from == SlideFrom::Top));

        let default_group = layout.group(Position::BottomRight).unwrap();
        assert_eq!(default_group.toasts[0].toast.id, b);
        assert_eq!(default_group.toasts[0].slide_from, SlideFrom::Right);

        let left = layout.group(Position::BottomLeft).unwrap();
        assert_eq!(left.toasts[0].toast.id, d);
        assert_eq!(left.toasts[0].slide_from, SlideFrom::Left);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entering_settles_after_delay() {
        let center = create_center();
        let id = center.notify(ToastInput::info("hello"));

        assert_eq!(center.layout().iter().next().unwrap().phase, Phase::Entering);
        sleep(ms(9)).await;
        assert_eq!(center.phase(&id), Some(Phase::Entering));
        sleep(ms(2)).await;
        assert_eq!(center.layout().iter().next().unwrap().phase, Phase::Visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_visible_per_position() {
        let config = EngineConfig {
            max_visible: Some(1),
            ..Default::default()
        };
        let center = ToastCenter::new(config, ThemeRegistry::default()).unwrap();

        let old = center.notify(ToastInput::info("old").persistent());
        let new = center.notify(ToastInput::info("new").persistent());

        assert_eq!(center.phase(&old), Some(Phase::Exiting));
        sleep(ms(301)).await;

        let ids: Vec<_> = center.toasts().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![new]);
    }
}

// =============================================================================
// Theme Tests
// =============================================================================

mod theme_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_configure_info_icon_only() {
        let center = create_center();
        let before = center.theme().snapshot();

        center.configure_theme(
            ThemeOverride::new().variant(&Variant::Info, VariantOverride::default().icon("X")),
        );
        let after = center.theme().snapshot();

        assert_eq!(after.variants["info"].icon.as_deref(), Some("X"));
        for name in ["success", "error", "warning", "loading"] {
            assert_eq!(after.variants[name], before.variants[name]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_rereads_theme_each_draw() {
        let center = create_center();
        center.notify(ToastInput::info("Order #1042 pulled"));

        let first = center.render();
        assert_eq!(first[0].toasts[0].icon.as_deref(), Some("info-circle-filled"));

        center.configure_theme(
            ThemeOverride::new().variant(&Variant::Info, VariantOverride::default().icon("bell")),
        );
        let second = center.render();
        assert_eq!(second[0].toasts[0].icon.as_deref(), Some("bell"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_from_settings_applies_theme_and_engine() {
        let settings = assert_ok!(Settings::from_toml(
            r#"
            [engine]
            default_duration_ms = 1000

            [theme]
            base = "card"
            "#,
        ));
        let center = assert_ok!(ToastCenter::from_settings(&settings));

        let id = center.notify(ToastInput::success("Bound"));
        assert_eq!(center.get(&id).unwrap().duration, Some(ms(1000)));

        let rendered = center.render();
        assert!(rendered[0].toasts[0].class.starts_with("card "));
    }
}
