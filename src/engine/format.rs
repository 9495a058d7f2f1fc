//! Text formatting shared by the overlays

/// Lap time as `M:SS.mmm`, minutes unbounded.
pub fn lap_time(seconds: f64) -> String {
    let millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let (minutes, millis) = (millis / 60_000, millis % 60_000);
    format!("{minutes}:{:02}.{:03}", millis / 1000, millis % 1000)
}

/// Session clock as `H:MM:SS`, or `M:SS` below one hour.
pub fn clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (minutes, secs) = (total / 60, total % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 { format!("{hours}:{minutes:02}:{secs:02}") } else { format!("{minutes}:{secs:02}") }
}

/// Session length suffix: `/1h`, `/1h05m`, `/45m`; empty below one minute.
pub fn time_cap(seconds: f64) -> String {
    let total_minutes = (seconds / 60.0).max(0.0) as u64;
    let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
    let mut cap = String::new();
    if hours > 0 || minutes > 0 {
        cap.push('/');
    }
    if hours > 0 {
        cap.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        if hours > 0 {
            cap.push_str(&format!("{minutes:02}m"));
        } else {
            cap.push_str(&format!("{minutes}m"));
        }
    }
    cap
}

/// Lap deficit as shown in the gap columns, e.g. `   2L`.
pub fn laps_down(laps: i32) -> String {
    format!("{laps:4}L")
}
