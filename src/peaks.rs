//! Elevation milestones and progress between them.

/// A named summit used as a progress checkpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakMilestone {
    pub name: &'static str,
    /// State or region the summit belongs to. Empty for sea level.
    pub state: &'static str,
    pub elevation_m: f64,
}

impl PeakMilestone {
    pub const fn new(name: &'static str, state: &'static str, elevation_m: f64) -> Self {
        Self {
            name,
            state,
            elevation_m,
        }
    }
}

/// Starting point below the first milestone.
pub static SEA_LEVEL: PeakMilestone = PeakMilestone::new("Sea Level", "", 0.0);

/// Highest natural point of every US state, lowest first.
pub static US_STATE_HIGHPOINTS: &[PeakMilestone] = &[
    PeakMilestone::new("Britton Hill", "Florida", 105.0),
    PeakMilestone::new("Ebright Azimuth", "Delaware", 137.0),
    PeakMilestone::new("Driskill Mountain", "Louisiana", 163.0),
    PeakMilestone::new("Woodall Mountain", "Mississippi", 246.0),
    PeakMilestone::new("Jerimoth Hill", "Rhode Island", 247.0),
    PeakMilestone::new("Charles Mound", "Illinois", 376.0),
    PeakMilestone::new("Hoosier Hill", "Indiana", 383.0),
    PeakMilestone::new("Campbell Hill", "Ohio", 472.0),
    PeakMilestone::new("Hawkeye Point", "Iowa", 509.0),
    PeakMilestone::new("Taum Sauk Mountain", "Missouri", 540.0),
    PeakMilestone::new("High Point", "New Jersey", 550.0),
    PeakMilestone::new("Timms Hill", "Wisconsin", 595.0),
    PeakMilestone::new("Mount Arvon", "Michigan", 603.0),
    PeakMilestone::new("Eagle Mountain", "Minnesota", 701.0),
    PeakMilestone::new("Mount Frissell", "Connecticut", 725.0),
    PeakMilestone::new("Cheaha Mountain", "Alabama", 735.0),
    PeakMilestone::new("Mount Magazine", "Arkansas", 839.0),
    PeakMilestone::new("Mount Davis", "Pennsylvania", 979.0),
    PeakMilestone::new("Hoye-Crest", "Maryland", 1024.0),
    PeakMilestone::new("Mount Greylock", "Massachusetts", 1064.0),
    PeakMilestone::new("White Butte", "North Dakota", 1069.0),
    PeakMilestone::new("Sassafras Mountain", "South Carolina", 1085.0),
    PeakMilestone::new("Mount Sunflower", "Kansas", 1232.0),
    PeakMilestone::new("Black Mountain", "Kentucky", 1263.0),
    PeakMilestone::new("Mount Mansfield", "Vermont", 1340.0),
    PeakMilestone::new("Brasstown Bald", "Georgia", 1458.0),
    PeakMilestone::new("Spruce Knob", "West Virginia", 1482.0),
    PeakMilestone::new("Black Mesa", "Oklahoma", 1516.0),
    PeakMilestone::new("Katahdin", "Maine", 1606.0),
    PeakMilestone::new("Mount Marcy", "New York", 1629.0),
    PeakMilestone::new("Panorama Point", "Nebraska", 1654.0),
    PeakMilestone::new("Mount Rogers", "Virginia", 1746.0),
    PeakMilestone::new("Mount Washington", "New Hampshire", 1917.0),
    PeakMilestone::new("Kuwohi", "Tennessee", 2025.0),
    PeakMilestone::new("Mount Mitchell", "North Carolina", 2037.0),
    PeakMilestone::new("Black Elk Peak", "South Dakota", 2208.0),
    PeakMilestone::new("Guadalupe Peak", "Texas", 2667.0),
    PeakMilestone::new("Mount Hood", "Oregon", 3429.0),
    PeakMilestone::new("Humphreys Peak", "Arizona", 3852.0),
    PeakMilestone::new("Borah Peak", "Idaho", 3859.0),
    PeakMilestone::new("Granite Peak", "Montana", 3904.0),
    PeakMilestone::new("Boundary Peak", "Nevada", 4007.0),
    PeakMilestone::new("Wheeler Peak", "New Mexico", 4013.0),
    PeakMilestone::new("Kings Peak", "Utah", 4123.0),
    PeakMilestone::new("Mauna Kea", "Hawaii", 4207.0),
    PeakMilestone::new("Gannett Peak", "Wyoming", 4209.0),
    PeakMilestone::new("Mount Rainier", "Washington", 4392.0),
    PeakMilestone::new("Mount Elbert", "Colorado", 4401.0),
    PeakMilestone::new("Mount Whitney", "California", 4421.0),
    PeakMilestone::new("Denali", "Alaska", 6190.0),
];

/// Where an altitude sits between two milestones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakProgress<'a> {
    /// Next milestone to reach, or the last one once all are passed.
    pub target: &'a PeakMilestone,
    /// Milestone the current segment starts from.
    pub base: &'a PeakMilestone,
    /// Percentage of the base→target segment covered, in `0..=100`.
    pub percent: f64,
    pub all_surpassed: bool,
}

impl PeakProgress<'_> {
    /// Whole meters left to the target, never negative.
    pub fn remaining_m(&self, altitude: f64) -> f64 {
        (self.target.elevation_m - altitude).max(0.0).round()
    }
}

/// Locate `altitude` among `peaks`, which must be sorted by elevation.
///
/// The target is the first peak strictly higher than `altitude`, so standing
/// exactly on a summit starts the next segment at 0%. Past the last peak the
/// progress is pinned to 100%. Returns `None` when `peaks` is empty.
pub fn compute_progress(altitude: f64, peaks: &[PeakMilestone]) -> Option<PeakProgress<'_>> {
    let last = peaks.last()?;
    let Some(index) = peaks.iter().position(|p| p.elevation_m > altitude) else {
        let base = peaks
            .len()
            .checked_sub(2)
            .map_or(&SEA_LEVEL, |i| &peaks[i]);
        return Some(PeakProgress {
            target: last,
            base,
            percent: 100.0,
            all_surpassed: true,
        });
    };

    let target = &peaks[index];
    let base = index.checked_sub(1).map_or(&SEA_LEVEL, |i| &peaks[i]);
    let span = target.elevation_m - base.elevation_m;
    let raw = if span > 0.0 {
        (altitude - base.elevation_m) / span * 100.0
    } else {
        0.0
    };
    Some(PeakProgress {
        target,
        base,
        percent: raw.clamp(0.0, 100.0),
        all_surpassed: false,
    })
}

/// Number of peaks at or below `altitude`.
pub fn peaks_conquered(altitude: f64, peaks: &[PeakMilestone]) -> usize {
    peaks.iter().filter(|p| p.elevation_m <= altitude).count()
}
