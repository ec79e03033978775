use crate::sim::{Rgb, Simulation};
use std::io::Write;

const PANEL_WIDTH: usize = 34;
const PANEL_BG: Rgb = (0, 0, 0);

const TITLE: Rgb = (255, 255, 140);
const PAUSE_KEY: Rgb = (180, 255, 180);
const RESET_KEY: Rgb = (255, 160, 160);
const KEY: Rgb = (220, 220, 255);
const HEADING: Rgb = (255, 220, 100);
const VALUE: Rgb = (255, 240, 160);
const PAUSED: Rgb = (255, 80, 80);

/// Settings panel drawn over the top-left corner. The encoded bytes are
/// rebuilt only when the simulation version moves.
pub struct Hud {
    cols: usize,
    rows: usize,
    cache: Option<(u64, Vec<u8>)>,
}

impl Hud {
    /// A panel clipped to a `cols` x `rows` terminal.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows, cache: None }
    }

    pub fn is_stale(&self, version: u64) -> bool {
        !matches!(&self.cache, Some((cached, _)) if *cached == version)
    }

    pub fn overlay(&mut self, sim: &Simulation) -> std::io::Result<&[u8]> {
        let version = sim.version();
        if self.is_stale(version) {
            self.cache = Some((version, self.build(sim)?));
        }
        Ok(self.cache.as_ref().map(|(_, bytes)| bytes.as_slice()).unwrap_or_default())
    }

    fn lines(sim: &Simulation) -> Vec<Option<(String, Rgb)>> {
        let c = sim.config();
        let mut lines = vec![
            Some(("CONTROLS".to_string(), TITLE)),
            None,
            Some(("SPACE    pause".to_string(), PAUSE_KEY)),
            Some(("ESC      reset".to_string(), RESET_KEY)),
            Some(("X        quit".to_string(), RESET_KEY)),
            None,
            Some(("G/B      gravity".to_string(), KEY)),
            Some(("Up/Down  rocket speed".to_string(), KEY)),
            Some(("Q/E      launch rate".to_string(), KEY)),
            Some(("R/F      spark spread".to_string(), KEY)),
            Some(("PgUp/Dn  spark count".to_string(), KEY)),
            None,
            Some(("PARAMETERS".to_string(), HEADING)),
            None,
            Some((format!("Gravity:  {:.3}", c.gravity), VALUE)),
            Some((
                format!("Speed:    {:.1} .. {:.1}", c.firework_min_speed, c.firework_max_speed),
                VALUE,
            )),
            Some((format!("Rate:     {:.4}", c.firework_spawn_rate), VALUE)),
            Some((format!("Sparks:   {}–{}", c.particle_count_min, c.particle_count_max), VALUE)),
            Some((format!("Spread:   {:.3}", c.particle_spread), VALUE)),
        ];
        if sim.is_paused() {
            lines.push(None);
            lines.push(Some(("PAUSED".to_string(), PAUSED)));
        }
        lines
    }

    fn build(&self, sim: &Simulation) -> std::io::Result<Vec<u8>> {
        let lines = Self::lines(sim);
        let mut out = Vec::with_capacity(lines.len() * (PANEL_WIDTH + 32));
        let (r, g, b) = PANEL_BG;
        // the panel starts in column 2
        let width = PANEL_WIDTH.min(self.cols.saturating_sub(1));
        if width == 0 {
            return Ok(out);
        }

        // one blank row of padding above and below
        let rows = std::iter::once(None).chain(lines).chain(std::iter::once(None));
        for (row, line) in rows.enumerate() {
            let term_row = row + 2;
            if term_row > self.rows {
                break;
            }
            write!(out, "\x1b[{term_row};2H\x1b[48;2;{r};{g};{b}m")?;
            let text = match &line {
                Some((text, (tr, tg, tb))) => {
                    write!(out, "\x1b[1;38;2;{tr};{tg};{tb}m")?;
                    format!("  {text}")
                }
                None => String::new(),
            };
            let cell: String = format!("{text:<pad$}", pad = PANEL_WIDTH).chars().take(width).collect();
            out.extend_from_slice(cell.as_bytes());
            out.extend_from_slice(b"\x1b[0m");
        }
        Ok(out)
    }
}
