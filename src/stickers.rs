//! Sticker-rain decoration.
//!
//! [`StickerRain`] is a fixed-size pool: stickers spawn above the viewport,
//! fall with a little drift and spin, and are replaced by a fresh spawn as
//! soon as they drop below the bottom edge. Steps are throttled to the device
//! profile's frame budget.
//!
//! The site is static, so the pool is run ahead of time: each slot's next
//! few falls, each from a fresh spawn, are simulated frame by frame and
//! written out as one looping CSS `@keyframes` rule ([`plan`] /
//! [`StickerPlan::to_css`]). Positions are emitted in `vw`/`vh` so the same
//! keyframes fit any screen.

use crate::config::{StickerProfileConfig, StickersConfig};
use rand::Rng;
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

pub const STICKER_EXTENSIONS: &[&str] = &["png", "webp", "gif", "svg"];

/// Upper bound on simulated frames for one fall.
const MAX_FALL_FRAMES: u32 = 100_000;

/// Successive falls baked into each slot's animation loop.
pub const FALLS_PER_SLOT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Desktop,
    Mobile,
}

/// Everything that differs between a desktop and a mobile rain.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProfile {
    pub device: Device,
    pub count: usize,
    pub min_size: f64,
    pub max_size: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub frame_budget_ms: f64,
    pub rotation_speed: f64,
    pub drift: f64,
}

impl DeviceProfile {
    pub fn from_config(device: Device, config: &StickersConfig) -> Self {
        let p: &StickerProfileConfig = match device {
            Device::Desktop => &config.desktop,
            Device::Mobile => &config.mobile,
        };
        Self {
            device,
            count: p.count,
            min_size: p.min_size,
            max_size: p.max_size,
            min_speed: p.min_speed,
            max_speed: p.max_speed,
            frame_budget_ms: f64::from(p.frame_budget_ms),
            rotation_speed: config.rotation_speed,
            drift: config.drift,
        }
    }
}

/// One falling sticker.
#[derive(Debug, Clone, PartialEq)]
pub struct Sticker {
    /// Index into the sticker image list.
    pub image: usize,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// px per frame
    pub speed: f64,
    /// degrees
    pub rotation: f64,
    /// degrees per frame
    pub rotation_speed: f64,
    /// px per frame
    pub drift: f64,
}

impl Sticker {
    fn advance(&mut self) {
        self.y += self.speed;
        self.x += self.drift;
        self.rotation += self.rotation_speed;
    }
}

#[derive(Debug, Clone)]
pub struct StickerRain {
    profile: DeviceProfile,
    width: f64,
    height: f64,
    image_count: usize,
    stickers: Vec<Sticker>,
    last_frame_ms: Option<f64>,
    recycled: usize,
}

impl StickerRain {
    /// An empty rain over a `width` × `height` viewport.
    pub fn new(profile: DeviceProfile, width: f64, height: f64, image_count: usize) -> Self {
        Self {
            profile,
            width,
            height,
            image_count,
            stickers: Vec::new(),
            last_frame_ms: None,
            recycled: 0,
        }
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    /// Number of stickers replaced after leaving the viewport.
    pub fn recycled(&self) -> usize {
        self.recycled
    }

    /// Spawn until the pool holds the profile's count. No-op without images.
    pub fn fill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        while self.stickers.len() < self.profile.count && self.spawn(rng).is_some() {}
    }

    /// Add one sticker at a random x, somewhere above the top edge.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&Sticker> {
        let sticker = self.new_sticker(rng)?;
        self.stickers.push(sticker);
        self.stickers.last()
    }

    /// Advance every sticker one frame, unless less than a frame budget has
    /// passed since the last real step. Returns whether a step happened.
    pub fn step<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> bool {
        if let Some(last) = self.last_frame_ms
            && now_ms - last < self.profile.frame_budget_ms
        {
            return false;
        }
        self.last_frame_ms = Some(now_ms);

        for i in 0..self.stickers.len() {
            self.stickers[i].advance();
            if self.stickers[i].y > self.height
                && let Some(fresh) = self.new_sticker(rng)
            {
                self.stickers[i] = fresh;
                self.recycled += 1;
            }
        }
        true
    }

    /// Viewport got a new width: stickers now right of it move back inside.
    pub fn reflow<R: Rng + ?Sized>(&mut self, width: f64, rng: &mut R) {
        self.width = width;
        for sticker in &mut self.stickers {
            if sticker.x > width {
                sticker.x = rng.r#gen::<f64>() * width;
            }
        }
    }

    fn new_sticker<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Sticker> {
        if self.image_count == 0 {
            return None;
        }
        let p = &self.profile;
        let size = rng.gen_range(p.min_size..=p.max_size);
        Some(Sticker {
            image: rng.gen_range(0..self.image_count),
            x: rng.r#gen::<f64>() * self.width,
            y: -size - rng.r#gen::<f64>() * (self.height / 2.0),
            size,
            speed: rng.gen_range(p.min_speed..=p.max_speed),
            rotation: rng.r#gen::<f64>() * 360.0,
            rotation_speed: rng.gen_range(-1.0..=1.0) * p.rotation_speed,
            drift: rng.gen_range(-1.0..=1.0) * p.drift,
        })
    }
}

// =============================================================================
// Static rendering
// =============================================================================

/// One fall from spawn to just below the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub start: Sticker,
    pub end: Sticker,
    pub frames: u32,
    pub duration_ms: f64,
}

/// Simulate `sticker` until it leaves a viewport `height` px tall.
pub fn trajectory(sticker: &Sticker, height: f64, frame_budget_ms: f64) -> Trajectory {
    let mut end = sticker.clone();
    let mut frames = 0;
    while end.y <= height && frames < MAX_FALL_FRAMES {
        end.advance();
        frames += 1;
    }
    Trajectory {
        start: sticker.clone(),
        end,
        frames,
        duration_ms: f64::from(frames) * frame_budget_ms,
    }
}

/// One `<img>` slot of the rain: its image, its rendered width, and the
/// falls it loops through.
///
/// Later falls come from fresh spawns with their own x, speed and spin. The
/// image element stays the same, so a different spawned size is drawn as a
/// scale of the first.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotRain {
    pub image: usize,
    pub size: f64,
    pub delay_ms: f64,
    pub falls: Vec<Trajectory>,
}

impl SlotRain {
    pub fn frames(&self) -> u32 {
        self.falls.iter().map(|f| f.frames).sum()
    }

    pub fn duration_ms(&self) -> f64 {
        self.falls.iter().map(|f| f.duration_ms).sum()
    }
}

/// Precomputed rain for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct StickerPlan {
    /// Site-relative sticker image paths.
    pub images: Vec<String>,
    pub desktop: Vec<SlotRain>,
    pub mobile: Vec<SlotRain>,
    pub viewport: [f64; 2],
    pub mobile_width: f64,
    pub mobile_breakpoint: u32,
}

/// Run a desktop and a mobile pool and record [`FALLS_PER_SLOT`] falls per slot.
///
/// Returns `None` when stickers are disabled or there are no images.
pub fn plan<R: Rng + ?Sized>(
    config: &StickersConfig,
    images: Vec<String>,
    viewport: [u32; 2],
    rng: &mut R,
) -> Option<StickerPlan> {
    if !config.enabled {
        return None;
    }
    if images.is_empty() {
        info!("no sticker images found, skipping sticker rain");
        return None;
    }
    let [width, height] = viewport.map(f64::from);
    let mobile_width = f64::from(config.mobile_breakpoint).min(width);

    let mut slots_for = |device: Device, w: f64| {
        let profile = DeviceProfile::from_config(device, config);
        let mut rain = StickerRain::new(profile, w, height, images.len());
        rain.fill(rng);
        let budget = rain.profile().frame_budget_ms;
        let mut slots = Vec::with_capacity(rain.stickers().len());
        for (slot, first) in rain.stickers().iter().enumerate() {
            let mut falls = vec![trajectory(first, height, budget)];
            while falls.len() < FALLS_PER_SLOT {
                let Some(next) = rain.new_sticker(rng) else {
                    break;
                };
                falls.push(trajectory(&next, height, budget));
            }
            slots.push(SlotRain {
                image: first.image,
                size: first.size,
                delay_ms: slot as f64 * f64::from(config.stagger_ms),
                falls,
            });
        }
        slots
    };
    let desktop = slots_for(Device::Desktop, width);
    let mut mobile = slots_for(Device::Mobile, mobile_width);
    // Mobile slots reuse the desktop slot's image element.
    for (m, d) in mobile.iter_mut().zip(&desktop) {
        m.image = d.image;
    }
    debug!(
        desktop = desktop.len(),
        mobile = mobile.len(),
        "planned sticker rain"
    );

    Some(StickerPlan {
        images,
        desktop,
        mobile,
        viewport: [width, height],
        mobile_width,
        mobile_breakpoint: config.mobile_breakpoint,
    })
}

impl StickerPlan {
    /// Image path for each slot, in slot order.
    pub fn slot_images(&self) -> impl Iterator<Item = &str> {
        self.desktop.iter().map(|t| self.images[t.image].as_str())
    }

    pub fn to_css(&self) -> String {
        let [width, height] = self.viewport;
        let mut css = String::new();
        for (slot, t) in self.desktop.iter().enumerate() {
            write_slot(&mut css, "d", slot, t, width, height, "");
        }
        let _ = writeln!(css, "@media (max-width: {}px) {{", self.mobile_breakpoint);
        for (slot, t) in self.mobile.iter().enumerate() {
            write_slot(&mut css, "m", slot, t, self.mobile_width, height, "    ");
        }
        let _ = writeln!(
            css,
            "    .sticker:nth-child(n+{}) {{ display: none; }}",
            self.mobile.len() + 1
        );
        css.push_str("}\n");
        css.push_str(
            "@media (prefers-reduced-motion: reduce) {\n    .stickers-container { display: none; }\n}\n",
        );
        css
    }
}

/// Keyframe offset that follows a fall's end; both points are off screen,
/// so the jump between them is never drawn.
const RESPAWN_GAP_PCT: f64 = 0.001;

fn write_slot(css: &mut String, tag: &str, slot: usize, rain: &SlotRain, width: f64, height: f64, pad: &str) {
    let name = format!("sticker-fall-{tag}{slot}");
    let total = f64::from(rain.frames().max(1));
    let mut stops = Vec::with_capacity(rain.falls.len() * 2);
    let mut elapsed = 0u32;
    for (i, fall) in rain.falls.iter().enumerate() {
        let start_pct = f64::from(elapsed) / total * 100.0 + if i == 0 { 0.0 } else { RESPAWN_GAP_PCT };
        elapsed += fall.frames;
        let end_pct = f64::from(elapsed) / total * 100.0;
        let scale = fall.start.size / rain.size;
        stops.push(format!("{start_pct:.3}% {{ transform: {}; }}", transform(&fall.start, scale, width, height)));
        stops.push(format!("{end_pct:.3}% {{ transform: {}; }}", transform(&fall.end, scale, width, height)));
    }
    let _ = writeln!(css, "{pad}@keyframes {name} {{ {} }}", stops.join(" "));
    let _ = writeln!(
        css,
        "{pad}.sticker-{slot} {{ width: {:.1}px; animation: {name} {:.0}ms linear {:.0}ms infinite backwards; }}",
        rain.size,
        rain.duration_ms(),
        rain.delay_ms,
    );
}

fn transform(s: &Sticker, scale: f64, width: f64, height: f64) -> String {
    format!(
        "translate({:.2}vw, {:.2}vh) rotate({:.1}deg) scale({:.3})",
        s.x / width * 100.0,
        s.y / height * 100.0,
        s.rotation,
        scale
    )
}

/// List sticker images directly inside `dir`, as `<url_prefix>/<file>`, sorted.
///
/// A missing directory yields an empty list.
pub fn discover(dir: &Path, url_prefix: &str) -> io::Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_sticker = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| STICKER_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if is_sticker && let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            found.push(format!("{}/{}", url_prefix.trim_end_matches('/'), name));
        }
    }
    Ok(found)
}
