//! Static 2D structure depictions rendered to PNG.
//!
//! Drawing conventions: hydrogens are folded into their parent's label,
//! carbon atoms are unlabeled unless charged, isotopic or isolated, double
//! bonds inside rings are drawn with the second stroke toward the ring
//! centre and triple bonds as three parallel strokes.

pub mod glyphs;

use crate::core::models::molecule::Molecule;
use crate::core::models::element::Element;
use crate::core::models::topology::BondOrder;
use crate::core::perception::rings::RingInfo;
use nalgebra::{Point2, Vector2};
use std::path::Path;
use thiserror::Error;
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

const BOND_COLOR: [u8; 3] = [34, 34, 34];
/// Fraction of the bond length separating the strokes of a multiple bond.
const MULTIPLE_BOND_OFFSET: f32 = 0.18;
/// Fraction trimmed from each end of the inner ring stroke.
const INNER_STROKE_TRIM: f32 = 0.15;
/// Label cap height as a fraction of the bond length.
const LABEL_SIZE: f32 = 0.42;

#[derive(Debug, Error)]
pub enum DepictionError {
    #[error("Invalid image size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Layout has {points} points for {atoms} atoms")]
    LayoutMismatch { atoms: usize, points: usize },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepictionOptions {
    pub width: u32,
    pub height: u32,
    /// Margin kept free on every side, in pixels.
    pub padding: f32,
    /// Upper bound on the on-screen bond length, in pixels.
    pub max_bond_length: f32,
    pub line_width: f32,
}

impl Default for DepictionOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 520,
            padding: 40.0,
            max_bond_length: 60.0,
            line_width: 2.5,
        }
    }
}

/// Renders a structure with its 2D layout and encodes it as PNG bytes.
///
/// # Arguments
///
/// * `mol` - The heavy-atom structural graph in Kekulé form.
/// * `layout` - One 2D point per atom, in bond-length units.
/// * `options` - Image size and stroke settings.
///
/// # Errors
///
/// Returns [`DepictionError`] if the size is zero, the layout does not
/// match the molecule, or PNG encoding fails.
pub fn render_png(
    mol: &Molecule,
    layout: &[Point2<f64>],
    options: &DepictionOptions,
) -> Result<Vec<u8>, DepictionError> {
    let pixmap = render(mol, layout, options)?;
    pixmap
        .encode_png()
        .map_err(|e| DepictionError::Encode(e.to_string()))
}

/// Renders and writes a PNG file.
///
/// # Errors
///
/// Same as [`render_png`], plus I/O failures while writing `path`.
pub fn write_png<P: AsRef<Path>>(
    mol: &Molecule,
    layout: &[Point2<f64>],
    options: &DepictionOptions,
    path: P,
) -> Result<(), DepictionError> {
    let bytes = render_png(mol, layout, options)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn render(
    mol: &Molecule,
    layout: &[Point2<f64>],
    options: &DepictionOptions,
) -> Result<Pixmap, DepictionError> {
    if layout.len() != mol.atom_count() {
        return Err(DepictionError::LayoutMismatch {
            atoms: mol.atom_count(),
            points: layout.len(),
        });
    }
    let mut canvas = Canvas::new(options)?;
    let visible: Vec<bool> = (0..mol.atom_count()).map(|i| is_drawn(mol, i)).collect();
    let Some(view) = Viewport::fit(layout, &visible, options) else {
        return Ok(canvas.pixmap);
    };

    let screen: Vec<Point2<f32>> = layout.iter().map(|p| view.project(p)).collect();
    let labels: Vec<Option<Label>> = (0..mol.atom_count())
        .map(|i| if visible[i] { atom_label(mol, i, &screen) } else { None })
        .collect();
    let font = view.bond_px * LABEL_SIZE / glyphs::CAP_HEIGHT;
    let clearance: Vec<f32> = labels
        .iter()
        .map(|l| l.as_ref().map_or(0.0, |_| glyphs::CAP_HEIGHT * font * 0.85))
        .collect();

    let rings = RingInfo::perceive(mol);
    for (b, bond) in mol.bonds().iter().enumerate() {
        if !(visible[bond.atom1] && visible[bond.atom2]) {
            continue;
        }
        let ring_centre = if rings.is_ring_bond(b) {
            rings.smallest_ring_with(bond.atom1, bond.atom2).map(|ring| {
                let sum = ring.iter().fold(Vector2::zeros(), |acc, &i| acc + screen[i].coords);
                Point2::from(sum / ring.len() as f32)
            })
        } else {
            None
        };
        let segment = BondSegment {
            from: screen[bond.atom1],
            to: screen[bond.atom2],
            trim_from: clearance[bond.atom1],
            trim_to: clearance[bond.atom2],
            color_from: end_color(mol, bond.atom1, &labels),
            color_to: end_color(mol, bond.atom2, &labels),
        };
        canvas.bond(&segment, bond.order, ring_centre, view.bond_px);
    }

    for (i, label) in labels.iter().enumerate() {
        if let Some(label) = label {
            canvas.label(screen[i], label, mol.atom(i).element.color(), font);
        }
    }
    Ok(canvas.pixmap)
}

/// Hydrogens are drawn only when they carry information of their own.
fn is_drawn(mol: &Molecule, idx: usize) -> bool {
    let atom = mol.atom(idx);
    if !atom.is_hydrogen() {
        return true;
    }
    atom.isotope != 0
        || atom.formal_charge != 0
        || mol.neighbors(idx).all(|n| mol.atom(n).is_hydrogen())
}

fn end_color(mol: &Molecule, idx: usize, labels: &[Option<Label>]) -> [u8; 3] {
    if labels[idx].is_some() && mol.atom(idx).element != Element::C {
        mol.atom(idx).element.color()
    } else {
        BOND_COLOR
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Label {
    symbol: String,
    hydrogens: String,
    charge: String,
    /// Hydrogens go before the symbol when every neighbor lies to the right.
    hydrogens_left: bool,
}

fn atom_label(mol: &Molecule, idx: usize, screen: &[Point2<f32>]) -> Option<Label> {
    let atom = mol.atom(idx);
    let labeled = atom.element != Element::C
        || atom.formal_charge != 0
        || atom.isotope != 0
        || mol.degree(idx) == 0;
    if !labeled {
        return None;
    }

    let mut symbol = String::new();
    if atom.isotope != 0 {
        symbol.push_str(&atom.isotope.to_string());
    }
    symbol.push_str(atom.element.symbol());

    let h = mol.total_hydrogens(idx)
        - mol.neighbors(idx).filter(|&n| is_drawn(mol, n) && mol.atom(n).is_hydrogen()).count() as u32;
    let hydrogens = match h {
        0 => String::new(),
        1 => "H".to_string(),
        n => format!("H{}", n),
    };
    let charge = match atom.formal_charge {
        0 => String::new(),
        1 => "+".to_string(),
        -1 => "-".to_string(),
        c if c > 0 => format!("{}+", c),
        c => format!("{}-", -c),
    };
    let hydrogens_left = mol.degree(idx) > 0
        && mol.neighbors(idx).all(|n| screen[n].x > screen[idx].x + 1.0);
    Some(Label {
        symbol,
        hydrogens,
        charge,
        hydrogens_left,
    })
}

/// Maps layout coordinates onto the pixmap, flipping y.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    centre: Point2<f64>,
    scale: f64,
    half_width: f32,
    half_height: f32,
    bond_px: f32,
}

impl Viewport {
    fn fit(layout: &[Point2<f64>], visible: &[bool], options: &DepictionOptions) -> Option<Self> {
        let points: Vec<&Point2<f64>> = layout
            .iter()
            .zip(visible)
            .filter_map(|(p, &v)| v.then_some(p))
            .collect();
        if points.is_empty() {
            return None;
        }
        let (mut lo, mut hi) = (*points[0], *points[0]);
        for p in &points {
            lo = Point2::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Point2::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        let avail_w = (options.width as f64 - 2.0 * options.padding as f64).max(1.0);
        let avail_h = (options.height as f64 - 2.0 * options.padding as f64).max(1.0);
        let mut scale = options.max_bond_length as f64;
        if hi.x - lo.x > 1e-9 {
            scale = scale.min(avail_w / (hi.x - lo.x));
        }
        if hi.y - lo.y > 1e-9 {
            scale = scale.min(avail_h / (hi.y - lo.y));
        }
        Some(Self {
            centre: Point2::new((lo.x + hi.x) / 2.0, (lo.y + hi.y) / 2.0),
            scale,
            half_width: options.width as f32 / 2.0,
            half_height: options.height as f32 / 2.0,
            bond_px: scale as f32,
        })
    }

    fn project(&self, p: &Point2<f64>) -> Point2<f32> {
        Point2::new(
            self.half_width + ((p.x - self.centre.x) * self.scale) as f32,
            self.half_height - ((p.y - self.centre.y) * self.scale) as f32,
        )
    }
}

struct BondSegment {
    from: Point2<f32>,
    to: Point2<f32>,
    trim_from: f32,
    trim_to: f32,
    color_from: [u8; 3],
    color_to: [u8; 3],
}

struct Canvas {
    pixmap: Pixmap,
    line_width: f32,
}

impl Canvas {
    fn new(options: &DepictionOptions) -> Result<Self, DepictionError> {
        let mut pixmap = Pixmap::new(options.width, options.height).ok_or(
            DepictionError::InvalidSize {
                width: options.width,
                height: options.height,
            },
        )?;
        pixmap.fill(tiny_skia::Color::WHITE);
        Ok(Self {
            pixmap,
            line_width: options.line_width,
        })
    }

    fn polyline(&mut self, points: &[Point2<f32>], color: [u8; 3], width: f32) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        let Some(path) = pb.finish() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], 255);
        paint.anti_alias = true;
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Draws one stroke split at its midpoint so each half takes its atom's color.
    fn two_tone(&mut self, from: Point2<f32>, to: Point2<f32>, colors: ([u8; 3], [u8; 3])) {
        let width = self.line_width;
        if colors.0 == colors.1 {
            self.polyline(&[from, to], colors.0, width);
        } else {
            let mid = Point2::from((from.coords + to.coords) / 2.0);
            self.polyline(&[from, mid], colors.0, width);
            self.polyline(&[mid, to], colors.1, width);
        }
    }

    fn bond(
        &mut self,
        seg: &BondSegment,
        order: BondOrder,
        ring_centre: Option<Point2<f32>>,
        bond_px: f32,
    ) {
        let delta = seg.to - seg.from;
        let length = delta.norm();
        if length <= seg.trim_from + seg.trim_to + 1.0 {
            return;
        }
        let dir = delta / length;
        let normal = Vector2::new(-dir.y, dir.x);
        let start = seg.from + dir * seg.trim_from;
        let end = seg.to - dir * seg.trim_to;
        let colors = (seg.color_from, seg.color_to);
        let offset = bond_px * MULTIPLE_BOND_OFFSET;

        match order {
            BondOrder::Single => self.two_tone(start, end, colors),
            BondOrder::Triple => {
                self.two_tone(start, end, colors);
                for side in [-1.0, 1.0] {
                    let shift = normal * (offset * side);
                    self.two_tone(start + shift, end + shift, colors);
                }
            }
            BondOrder::Double | BondOrder::Aromatic => match ring_centre {
                Some(centre) => {
                    self.two_tone(start, end, colors);
                    let mid = Point2::from((seg.from.coords + seg.to.coords) / 2.0);
                    let side = if normal.dot(&(centre - mid)) >= 0.0 { 1.0 } else { -1.0 };
                    let shift = normal * (offset * side);
                    let trim = dir * (length * INNER_STROKE_TRIM);
                    let inner_start = if seg.trim_from > 0.0 { start } else { start + trim };
                    let inner_end = if seg.trim_to > 0.0 { end } else { end - trim };
                    self.two_tone(inner_start + shift, inner_end + shift, colors);
                }
                None => {
                    for side in [-0.5, 0.5] {
                        let shift = normal * (offset * side);
                        self.two_tone(start + shift, end + shift, colors);
                    }
                }
            },
        }
    }

    fn text(&mut self, origin: Point2<f32>, text: &str, color: [u8; 3], unit: f32) {
        let width = (unit * 0.9).max(1.0);
        let mut x = origin.x;
        for ch in text.chars() {
            for stroke in glyphs::strokes_or_fallback(ch) {
                let points: Vec<Point2<f32>> = stroke
                    .iter()
                    .map(|&(gx, gy)| Point2::new(x + gx * unit, origin.y + gy * unit))
                    .collect();
                self.polyline(&points, color, width);
            }
            x += glyphs::advance(ch) * unit;
        }
    }

    /// Draws a label with the element symbol centred on the atom.
    fn label(&mut self, at: Point2<f32>, label: &Label, color: [u8; 3], unit: f32) {
        let small = unit * 0.7;
        let symbol_w = glyphs::text_width(&label.symbol) * unit;
        let top = at.y - glyphs::CAP_HEIGHT * unit / 2.0;
        let symbol_x = at.x - symbol_w / 2.0;
        let gap = unit;

        let h_count = label.hydrogens.get(1..).unwrap_or("");
        let h_w = glyphs::text_width("H") * unit;
        let count_w = glyphs::text_width(h_count) * small;

        self.text(Point2::new(symbol_x, top), &label.symbol, color, unit);
        let mut right_edge = symbol_x + symbol_w;
        if !label.hydrogens.is_empty() {
            let h_x = if label.hydrogens_left {
                symbol_x - gap - h_w - if count_w > 0.0 { count_w + gap * 0.5 } else { 0.0 }
            } else {
                right_edge + gap
            };
            self.text(Point2::new(h_x, top), "H", color, unit);
            if !h_count.is_empty() {
                let sub_top = top + glyphs::CAP_HEIGHT * (unit - small) + unit;
                self.text(Point2::new(h_x + h_w + gap * 0.5, sub_top), h_count, color, small);
            }
            if !label.hydrogens_left {
                right_edge = h_x + h_w + if count_w > 0.0 { gap * 0.5 + count_w } else { 0.0 };
            }
        }
        if !label.charge.is_empty() {
            let sup_top = top - small * 2.0;
            self.text(Point2::new(right_edge + gap * 0.5, sup_top), &label.charge, color, small);
        }
    }
}
