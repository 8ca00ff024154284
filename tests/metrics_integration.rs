//! Metric bookkeeping across a `ToastCenter`'s lifetime
//!
//! Kept in its own test binary: the gauges are process-wide, so no other test
//! may create toasts while these assertions run.

use std::time::Duration;

use tokio::time::sleep;

use toast_engine::center::ToastCenter;
use toast_engine::metrics::TOASTS_ACTIVE;
use toast_engine::notification::ToastInput;

// =============================================================================
// Active gauge
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_active_gauge_tracks_purge_and_drop() {
    let before = TOASTS_ACTIVE.get();
    let center = ToastCenter::with_defaults().expect("runtime available");

    let first = center.notify(ToastInput::info("a").persistent());
    center.notify(ToastInput::info("b").persistent());
    center.notify(ToastInput::info("c").duration_ms(60_000));
    assert_eq!(TOASTS_ACTIVE.get(), before + 3);

    center.dismiss(&first);
    sleep(Duration::from_millis(301)).await;
    assert_eq!(TOASTS_ACTIVE.get(), before + 2);

    drop(center);
    assert_eq!(TOASTS_ACTIVE.get(), before);
}
