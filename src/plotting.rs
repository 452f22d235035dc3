use chrono::{Datelike, NaiveDate};
use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke, Ui, epaint::CubicBezierShape, pos2, vec2};
use egui_plot::{Line, PlotPoints};

use crate::altitude::work_to_altitude;
use crate::peaks::PeakProgress;

/// Side length of the square the mountain is drawn in, before scaling.
pub const VIEW_SIZE: f32 = 300.0;

/// Control points of the slope, in view coordinates with y pointing down.
const SLOPE: [[Pos2; 4]; 2] = [
    [
        pos2(10.0, 290.0),
        pos2(80.0, 290.0),
        pos2(100.0, 200.0),
        pos2(150.0, 150.0),
    ],
    [
        pos2(150.0, 150.0),
        pos2(200.0, 100.0),
        pos2(220.0, 10.0),
        pos2(290.0, 10.0),
    ],
];

/// Running altitude total per day from daily work in joules, `x` in days
/// since the common era. The work is summed before converting so the last
/// point equals the overall altitude.
pub fn cumulative_altitude_points(daily_joules: &[(NaiveDate, f64)]) -> Vec<[f64; 2]> {
    let mut joules = 0.0;
    daily_joules
        .iter()
        .map(|(date, work)| {
            joules += work;
            [date.num_days_from_ce() as f64, work_to_altitude(joules)]
        })
        .collect()
}

pub fn cumulative_altitude_line(daily_joules: &[(NaiveDate, f64)]) -> Line {
    Line::new(PlotPoints::from(cumulative_altitude_points(daily_joules))).name("Altitude (m)")
}

/// Altitude gained on each day on its own.
pub fn daily_gain_line(daily: &[(NaiveDate, f64)]) -> Line {
    let points: Vec<[f64; 2]> = daily
        .iter()
        .map(|(date, altitude)| [date.num_days_from_ce() as f64, *altitude])
        .collect();
    Line::new(PlotPoints::from(points)).name("Daily gain (m)")
}

/// Boulder position for a progress percentage, in view coordinates.
///
/// Moves linearly along x and follows a smoothstep in y so that it sits on
/// the slope from the bottom-left (0%) to the top-right (100%).
pub fn boulder_position(percent: f64) -> Pos2 {
    let p = (percent / 100.0).clamp(0.0, 1.0) as f32;
    let eased = p * p * (3.0 - 2.0 * p);
    pos2(10.0 + 280.0 * p, 290.0 - 280.0 * eased)
}

fn to_screen(rect: Rect, p: Pos2) -> Pos2 {
    let scale = rect.width().min(rect.height()) / VIEW_SIZE;
    rect.min + vec2(p.x * scale, p.y * scale)
}

/// Draw the base and target lines, the slope and the boulder.
pub fn draw_mountain(ui: &mut Ui, progress: &PeakProgress<'_>, side: f32) {
    let (response, painter) = ui.allocate_painter(vec2(side, side), egui::Sense::hover());
    let rect = response.rect;
    let scale = side / VIEW_SIZE;
    let goal = Color32::from_rgb(0x34, 0x98, 0xdb);
    let base = Color32::from_rgb(0x95, 0xa5, 0xa6);
    let font = FontId::proportional(12.0 * scale.max(0.75));

    painter.line_segment(
        [to_screen(rect, pos2(0.0, 20.0)), to_screen(rect, pos2(300.0, 20.0))],
        Stroke::new(1.0, goal.gamma_multiply(0.5)),
    );
    painter.text(
        to_screen(rect, pos2(290.0, 15.0)),
        Align2::RIGHT_BOTTOM,
        format!("{} ({}m)", progress.target.name, progress.target.elevation_m),
        font.clone(),
        goal,
    );
    painter.line_segment(
        [to_screen(rect, pos2(0.0, 280.0)), to_screen(rect, pos2(300.0, 280.0))],
        Stroke::new(1.0, base.gamma_multiply(0.3)),
    );
    painter.text(
        to_screen(rect, pos2(10.0, 295.0)),
        Align2::LEFT_BOTTOM,
        format!("{} ({}m)", progress.base.name, progress.base.elevation_m),
        font,
        base,
    );

    for segment in SLOPE {
        let points = segment.map(|p| to_screen(rect, p));
        painter.add(CubicBezierShape::from_points_stroke(
            points,
            false,
            Color32::TRANSPARENT,
            Stroke::new(4.0 * scale, goal),
        ));
    }

    let boulder = to_screen(rect, boulder_position(progress.percent));
    painter.circle(
        boulder,
        8.0 * scale,
        Color32::WHITE,
        Stroke::new(3.0 * scale, Color32::from_rgb(0x2c, 0x3e, 0x50)),
    );
}
