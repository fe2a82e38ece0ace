//! Text view of the shop, redrawn on stdout at a fixed cadence.

use std::{
    io::{self, Write},
    sync::Arc,
    thread::{self, JoinHandle},
    time::Instant,
};

use shared::{
    customsync::shutdown::ShutdownToken,
    model::{constants::RENDER_INTERVAL, snapshot::ShopSnapshot},
};
use tracing::warn;

use super::shop::SharedShop;

const PROGRESS_BAR_WIDTH: usize = 24;
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";
const MAX_DRAWN_CHAIRS: usize = 20;

pub fn render(snapshot: &ShopSnapshot, now: Instant) -> String {
    let barber = match (snapshot.current_customer, snapshot.cut_progress(now)) {
        (Some(id), Some(progress)) => {
            let filled = (progress * PROGRESS_BAR_WIDTH as f64) as usize;
            let bar = "#".repeat(filled) + &"-".repeat(PROGRESS_BAR_WIDTH - filled);
            format!(
                "  Barber: Cutting C{:03}  [{}] {:3}%",
                id,
                bar,
                (progress * 100.0) as u32
            )
        }
        _ => "  Barber: Zzz (sleeping)".to_string(),
    };

    let recent: Vec<String> = snapshot
        .recently_served
        .iter()
        .map(|id| format!("C{:03}", id))
        .collect();

    let lines = [
        "  Sleeping Barber - Barbershop Simulation".to_string(),
        "  Controls: [1-5]+Enter = arrival speed, q+Enter = quit".to_string(),
        String::new(),
        format!(
            "  Chairs: {}  |  Speed: {}  |  Served: {}  |  Left: {}",
            snapshot.capacity, snapshot.arrival_speed, snapshot.served, snapshot.left
        ),
        String::new(),
        barber,
        String::new(),
        "  Waiting chairs:".to_string(),
        format!("    {}", render_chairs(snapshot)),
        String::new(),
        format!("  Recently served: {}", recent.join(" ")),
        String::new(),
        "  Legend: [NN]=customer id in queue; empty chair=[  ]".to_string(),
    ];
    lines.join("\n") + "\n"
}

/// Draws at most [`MAX_DRAWN_CHAIRS`] chairs and summarizes the rest.
fn render_chairs(snapshot: &ShopSnapshot) -> String {
    let drawn = snapshot.capacity.min(MAX_DRAWN_CHAIRS);
    let mut chairs: Vec<String> = (0..drawn)
        .map(|chair| match snapshot.waiting.get(chair) {
            Some(id) => format!("[{:02}]", id),
            None => "[  ]".to_string(),
        })
        .collect();
    if snapshot.capacity > drawn {
        let hidden_waiting = snapshot.waiting.len().saturating_sub(drawn);
        chairs.push(format!(
            "... +{} chairs ({} waiting)",
            snapshot.capacity - drawn,
            hidden_waiting
        ));
    }
    chairs.join(" ")
}

pub fn setup_renderer(shop: Arc<SharedShop>, shutdown: ShutdownToken) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stdout = io::stdout();
        while !shutdown.is_raised() {
            let view = render(&shop.snapshot(), Instant::now());
            if let Err(err) = write!(stdout, "{}{}", CLEAR_SCREEN, view).and_then(|_| stdout.flush())
            {
                warn!("[Renderer] Could not draw the shop: {}", err);
                break;
            }
            shutdown.sleep(RENDER_INTERVAL);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::model::{shop_state::BarberStatus, speed::SpeedLevel};
    use std::time::Duration;

    fn snapshot() -> ShopSnapshot {
        ShopSnapshot {
            capacity: 4,
            waiting: vec![12, 13],
            served: 9,
            left: 2,
            arrivals: 14,
            barber_status: BarberStatus::Sleeping,
            current_customer: None,
            cut_started_at: None,
            cut_duration: Duration::from_secs(2),
            arrival_speed: SpeedLevel::Busy,
            recently_served: vec![9, 10],
        }
    }

    #[test]
    fn test_render_sleeping_barber_and_chairs() {
        let view = render(&snapshot(), Instant::now());
        assert!(view.contains("Chairs: 4  |  Speed: 4  |  Served: 9  |  Left: 2"));
        assert!(view.contains("Barber: Zzz (sleeping)"));
        assert!(view.contains("[12] [13] [  ] [  ]"));
        assert!(view.contains("Recently served: C009 C010"));
    }

    #[test]
    fn test_render_cut_in_progress() {
        let started = Instant::now();
        let mut snapshot = snapshot();
        snapshot.barber_status = BarberStatus::Cutting;
        snapshot.current_customer = Some(11);
        snapshot.cut_started_at = Some(started);

        let view = render(&snapshot, started + Duration::from_secs(1));
        let bar = "#".repeat(12) + &"-".repeat(12);
        assert!(view.contains(&format!("Barber: Cutting C011  [{}]  50%", bar)));
    }

    #[test]
    fn test_render_huge_waiting_room_draws_a_bounded_row() {
        let mut snapshot = snapshot();
        snapshot.capacity = usize::MAX;
        let view = render(&snapshot, Instant::now());
        let hidden = usize::MAX - MAX_DRAWN_CHAIRS;
        assert!(view.contains(&format!("... +{} chairs (0 waiting)", hidden)));
        assert_eq!(view.matches("[  ]").count(), MAX_DRAWN_CHAIRS - 2 + 1);
    }
}
