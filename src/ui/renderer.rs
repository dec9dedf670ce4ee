/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Paint order: starfield, progress bar and HUD, content layers
/// (exiting under entering), controls, help overlay. Clickable regions
/// are recorded into `Tour::hitboxes` while painting.

use std::collections::HashMap;
use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::content::{content_for, StageContent};
use crate::domain::stage::Stage;
use crate::sim::nav::NavCommand;
use crate::sim::transition::Layer;
use crate::sim::world::{Hitbox, Tour, SUB_ROWS};
use crate::ui::assets::AssetCatalog;
use crate::ui::view::{self, char_width, str_width, Align, Line, Tone};

type Rgb = (u8, u8, u8);

const BG: Rgb = (13, 17, 23);
const STAR: Rgb = (230, 237, 243);

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// inter-row gap on VTE terminals matches the cell colour.
    const BASE_BG: Color = Color::Rgb { r: BG.0, g: BG.1, b: BG.2 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 4],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = bg;
        cell.wide = char_width(c) == 2;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or(" ")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string starting at column `x` (may be negative or run off
    /// the right edge; clipped per char). Wide chars take two columns and
    /// are dropped whole if they would straddle an edge. Returns the
    /// column after the last char.
    fn put_str(&mut self, x: i32, y: usize, s: &str, fg: Color) -> i32 {
        let mut cx = x;
        for ch in s.chars() {
            let w = char_width(ch) as i32;
            if cx >= 0 && (cx + w) as usize <= self.width {
                let col = cx as usize;
                // overwriting half of a wide char leaves the other half stale
                self.clear_wide_at(col, y);
                if w == 2 {
                    self.clear_wide_at(col + 1, y);
                }
                self.set(col, y, Cell::from_char(ch, fg, Cell::BASE_BG));
                if w == 2 {
                    self.set(col + 1, y, Cell::WIDE_CONT);
                }
            }
            cx += w;
        }
        cx
    }

    fn clear_wide_at(&mut self, x: usize, y: usize) {
        let cell = self.get(x, y);
        if cell.cont && x > 0 {
            self.set(x - 1, y, Cell::BLANK);
        } else if cell.wide {
            self.set(x + 1, y, Cell::BLANK);
        }
        self.set(x, y, Cell::BLANK);
    }

    fn fill_row(&mut self, x0: usize, x1: usize, y: usize, bg: Color) {
        for x in x0..x1.min(self.width) {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }
}

// ── Colour ──

fn rgb(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

/// `fg` faded toward the background by `alpha` (0 = invisible).
fn blend(fg: Rgb, alpha: f32) -> Color {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (b as f32 + (f as f32 - b as f32) * a).round() as u8;
    Color::Rgb { r: mix(fg.0, BG.0), g: mix(fg.1, BG.1), b: mix(fg.2, BG.2) }
}

fn tone_rgb(tone: Tone) -> Rgb {
    match tone {
        Tone::Title => (240, 246, 252),
        Tone::Heading => (201, 209, 217),
        Tone::Accent => (88, 166, 255),
        Tone::Body => (175, 184, 193),
        Tone::Muted => (110, 118, 129),
        Tone::Emphasis => (255, 255, 255),
        Tone::Highlight => (121, 192, 255),
        Tone::Badge => (188, 140, 255),
        Tone::Success => (63, 185, 80),
        Tone::Link => (88, 166, 255),
        Tone::Placeholder => (72, 79, 88),
        Tone::Button => (255, 215, 0),
    }
}

fn star_glyph(size: f32) -> char {
    if size < 0.5 {
        '.'
    } else if size < 1.0 {
        '·'
    } else if size < 1.5 {
        '+'
    } else {
        '*'
    }
}

// ── Layout ──

const PROGRESS_ROW: usize = 0;
const HUD_ROW: usize = 1;
const CONTENT_TOP: usize = 3;
const MAX_CONTENT_W: usize = 96;
const MIN_COLS: usize = 24;
const MIN_ROWS: usize = 8;

const PREV_LABEL: &str = "‹ PREV";
const NEXT_LABEL: &str = "NEXT ›";

fn page<'a>(
    pages: &'a mut HashMap<(Stage, usize), Vec<Line>>,
    content: &'static StageContent,
    width: usize,
    assets: &AssetCatalog,
) -> &'a [Line] {
    pages
        .entry((content.stage(), width))
        .or_insert_with(|| view::compose(content, assets, width))
}

fn content_width(cols: usize) -> usize {
    cols.saturating_sub(8).min(MAX_CONTENT_W)
}

fn bottom_row(rows: usize) -> usize {
    rows.saturating_sub(1)
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    /// Composed pages by (stage, width).
    pages: HashMap<(Stage, usize), Vec<Line>>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            pages: HashMap::new(),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn size(&self) -> (u16, u16) {
        (self.term_w as u16, self.term_h as u16)
    }

    pub fn render(&mut self, tour: &mut Tour, assets: &AssetCatalog) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.compose_frame(tour, assets);

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    /// Build the front buffer and this frame's hit boxes.
    fn compose_frame(&mut self, tour: &mut Tour, assets: &AssetCatalog) {
        self.front.clear();
        tour.hitboxes.clear();

        if self.term_w < MIN_COLS || self.term_h < MIN_ROWS {
            self.compose_too_small();
        } else {
            self.compose_stars(tour);
            self.compose_progress(tour);
            self.compose_content(tour, assets);
            self.compose_controls(tour);
            if tour.help_visible {
                self.compose_help();
                // nothing under the overlay is clickable
                tour.hitboxes.clear();
            }
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colours; ResetColor would fall back to the
        // terminal default and show line artifacts.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Skip continuation cells (right half of a wide char)
                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                // For wide cells, also check if the continuation changed
                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_too_small(&mut self) {
        let msg = "window too small";
        let x = self.term_w.saturating_sub(msg.len()) / 2;
        let y = self.term_h / 2;
        self.front.put_str(x as i32, y, msg, rgb(tone_rgb(Tone::Muted)));
    }

    fn compose_stars(&mut self, tour: &Tour) {
        let layer = match tour.starfield.as_ref() {
            Some(l) => l,
            None => return,
        };
        for star in layer.field.visible() {
            let col = star.x.floor();
            let row = (star.y / SUB_ROWS as f32).floor();
            if col < 0.0 || row < 0.0 {
                continue;
            }
            let glyph = star_glyph(star.size);
            self.front.set(
                col as usize,
                row as usize,
                Cell::from_char(glyph, blend(STAR, star.alpha), Cell::BASE_BG),
            );
        }
    }

    fn compose_progress(&mut self, tour: &Tour) {
        let cols = self.term_w;
        let fraction = tour.progress.value.clamp(0.0, 1.0);
        let filled = (fraction * cols as f32).round() as usize;
        let on = rgb(tone_rgb(Tone::Accent));
        let off = rgb((33, 38, 45));
        for x in 0..cols {
            let (ch, fg) = if x < filled { ('━', on) } else { ('─', off) };
            self.front.set(x, PROGRESS_ROW, Cell::from_char(ch, fg, Cell::BASE_BG));
        }

        let stage = tour.current();
        let muted = rgb(tone_rgb(Tone::Muted));
        self.front.put_str(2, HUD_ROW, stage.label(), muted);
        let counter = format!("STAGE {} / {}", stage.index() + 1, Stage::COUNT);
        let x = cols.saturating_sub(str_width(&counter) + 2);
        self.front.put_str(x as i32, HUD_ROW, &counter, rgb(tone_rgb(Tone::Heading)));
    }

    fn compose_content(&mut self, tour: &mut Tour, assets: &AssetCatalog) {
        let cols = self.term_w;
        let width = content_width(cols);
        let margin = (cols - width) / 2;
        let top = CONTENT_TOP;
        let region_h = bottom_row(self.term_h).saturating_sub(top + 1);

        // settle the scroll offset for the current page first
        let current = tour.current_view();
        let entering = *tour.transition.entering();
        let page_h = page(&mut self.pages, current, width, assets).len();
        let max_scroll = page_h.saturating_sub(region_h);
        tour.scroll = tour.scroll.min(max_scroll as u16);

        let layers: Vec<Layer> = tour.transition.layers().copied().collect();
        let settled = !tour.transition.in_flight();
        for layer in layers {
            let alpha = layer.alpha();
            if alpha < 0.02 {
                continue;
            }
            let is_current = layer == entering;
            let scroll = if is_current { tour.scroll as usize } else { 0 };
            let dx = (layer.x.value * cols as f32).round() as i32;
            let content = if is_current { current } else { content_for(layer.stage) };
            let lines = page(&mut self.pages, content, width, assets);
            let y0 = if lines.len() < region_h { top + (region_h - lines.len()) / 2 } else { top };

            for (i, line) in lines.iter().skip(scroll).take(region_h).enumerate() {
                let y = y0 + i;
                let lw = line.width();
                let indent = match line.align {
                    Align::Left => 0,
                    Align::Center => width.saturating_sub(lw) / 2,
                };
                let x0 = margin as i32 + indent as i32 + dx;
                let mut x = x0;
                for span in &line.spans {
                    x = self.front.put_str(x, y, &span.text, blend(tone_rgb(span.tone), alpha));
                }
                if let Some(cmd) = line.action.filter(|_| is_current && settled) {
                    if x0 >= 0 {
                        tour.hitboxes.push(Hitbox {
                            col: x0 as u16,
                            row: y as u16,
                            width: lw as u16,
                            height: 1,
                            command: cmd,
                        });
                    }
                }
            }

            if is_current && max_scroll > 0 {
                let marker = blend(tone_rgb(Tone::Muted), alpha);
                let edge = (margin + width + 1) as i32 + dx;
                if scroll > 0 {
                    self.front.put_str(edge, top, "▲", marker);
                }
                if scroll < max_scroll {
                    self.front.put_str(edge, top + region_h.saturating_sub(1), "▼", marker);
                }
            }
        }
    }

    fn compose_controls(&mut self, tour: &mut Tour) {
        let row = bottom_row(self.term_h);
        let cols = self.term_w;
        let stage = tour.current();

        let hint = "←/→ move  ↑/↓ scroll  ? help  q quit";
        let hint_w = str_width(hint);
        if hint_w + 2 * (str_width(PREV_LABEL) + 4) <= cols {
            let x = (cols - hint_w) / 2;
            self.front.put_str(x as i32, row, hint, rgb(tone_rgb(Tone::Placeholder)));
        }

        if stage != Stage::FIRST {
            let x = 2;
            self.front.put_str(x, row, PREV_LABEL, rgb(tone_rgb(Tone::Body)));
            tour.hitboxes.push(Hitbox {
                col: x as u16,
                row: row as u16,
                width: str_width(PREV_LABEL) as u16,
                height: 1,
                command: NavCommand::Retreat,
            });
        }

        if stage != Stage::LAST {
            let w = str_width(NEXT_LABEL);
            let x = cols.saturating_sub(w + 2);
            // gentle pulse, ~1s period at 60 fps
            let phase = (tour.anim_tick % 60) as f32 / 60.0;
            let pulse = 0.65 + 0.35 * (phase * std::f32::consts::TAU).cos().abs();
            self.front.put_str(x as i32, row, NEXT_LABEL, blend(tone_rgb(Tone::Button), pulse));
            tour.hitboxes.push(Hitbox {
                col: x as u16,
                row: row as u16,
                width: w as u16,
                height: 1,
                command: NavCommand::Advance,
            });
        }
    }

    fn compose_help(&mut self) {
        let panel = rgb((22, 27, 34));
        let key_c = rgb(tone_rgb(Tone::Accent));
        let desc_c = rgb(tone_rgb(Tone::Body));
        let hdr = rgb(tone_rgb(Tone::Button));

        let entries: [(&str, &str); 6] = [
            ("→  Space", "next stage"),
            ("←", "previous stage"),
            ("↑ ↓ PgUp PgDn", "scroll page"),
            ("click ‹ ›", "navigate"),
            ("?  F1", "toggle this help"),
            ("q  Esc", "quit"),
        ];

        let box_w = 40_usize.min(self.term_w);
        let box_h = (entries.len() + 4).min(self.term_h);
        let box_x = (self.term_w - box_w) / 2;
        let box_y = (self.term_h - box_h) / 2;

        for y in box_y..box_y + box_h {
            self.front.fill_row(box_x, box_x + box_w, y, panel);
        }

        let title = "HOW TO PLAY";
        let tx = box_x + (box_w.saturating_sub(title.len())) / 2;
        self.put_on(tx, box_y + 1, title, hdr, panel);

        for (i, (key, desc)) in entries.iter().enumerate() {
            let y = box_y + 3 + i;
            if y >= box_y + box_h {
                break;
            }
            self.put_on(box_x + 3, y, key, key_c, panel);
            self.put_on(box_x + 20, y, desc, desc_c, panel);
        }
    }

    /// `put_str` over a coloured panel.
    fn put_on(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let end = self.front.put_str(x as i32, y, s, fg);
        for cx in x..(end.max(0) as usize).min(self.front.width) {
            let mut cell = self.front.get(cx, y);
            cell.bg = bg;
            self.front.set(cx, y, cell);
        }
    }
}

#[cfg(test)]
impl Renderer {
    fn sized(w: usize, h: usize) -> Self {
        let mut r = Renderer::new();
        r.term_w = w;
        r.term_h = h;
        r.front.resize(w, h);
        r.back.resize(w, h);
        r
    }
}
