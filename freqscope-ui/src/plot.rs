use eframe::egui::{Color32, Context, Id, Response, Ui, Vec2, Widget};
use egui_plot::{Legend, Line, Plot, PlotMemory, PlotPoints};

use crate::chart::{ChartBackend, ChartSpec};

/// Space kept above the highest magnitude, as a fraction of the Y span.
const Y_HEADROOM: f64 = 0.05;

/// Chart backend drawing with `egui_plot`.
///
/// Each instance gets its own plot id, so egui_plot starts it with fresh
/// bounds. Destroying an instance drops the plot memory stored under that id.
pub struct PlotBackend {
    ctx: Context,
    generation: u64,
}

impl PlotBackend {
    pub fn new(ctx: Context) -> Self {
        Self { ctx, generation: 0 }
    }
}

pub struct PlotChart {
    id: Id,
    spec: ChartSpec,
    points: Vec<[f64; 2]>,
}

impl PlotChart {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }
}

impl ChartBackend for PlotBackend {
    type Instance = PlotChart;

    fn create(&mut self, spec: ChartSpec) -> PlotChart {
        self.generation += 1;
        PlotChart {
            id: Id::new(("freqscope_chart", self.generation)),
            points: spec.points(),
            spec,
        }
    }

    fn destroy(&mut self, chart: PlotChart) {
        self.ctx.data_mut(|data| data.remove::<PlotMemory>(chart.id));
    }
}

impl Widget for &PlotChart {
    fn ui(self, ui: &mut Ui) -> Response {
        let spec = &self.spec;
        let [r, g, b] = spec.color;

        let mut line = Line::new(spec.label, PlotPoints::new(self.points.clone()))
            .color(Color32::from_rgb(r, g, b));
        if spec.filled {
            line = line.fill(0.0);
        }

        // No automatic Y margin: the Y range below is drawn exactly.
        let mut plot = Plot::new("freqscope_spectrum")
            .id(self.id)
            .set_margin_fraction(Vec2::new(0.05, 0.0))
            .x_axis_label(spec.x_axis.title)
            .y_axis_label(spec.y_axis.title)
            .legend(Legend::default());
        if let Some((lo, hi)) = spec.y_range() {
            plot = plot.include_y(lo).include_y(hi + (hi - lo) * Y_HEADROOM);
        }
        if let Some((lo, hi)) = spec.x_range() {
            plot = plot.include_x(lo).include_x(hi);
        }

        plot.show(ui, |plot_ui| plot_ui.line(line)).response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{CentralPanel, RawInput};
    use freqscope_messages::Snapshot;

    fn spec(f: &[f64], m: &[f64]) -> ChartSpec {
        ChartSpec::from_snapshot(&Snapshot::new(f.to_vec(), m.to_vec()).unwrap())
    }

    fn draw(ctx: &Context, chart: &PlotChart) {
        let _ = ctx.run(RawInput::default(), |ctx| {
            CentralPanel::default().show(ctx, |ui| {
                ui.add(chart);
            });
        });
    }

    #[test]
    fn test_each_instance_gets_a_fresh_id() {
        let mut backend = PlotBackend::new(Context::default());
        let first = backend.create(spec(&[1.0], &[5.0]));
        let second = backend.create(spec(&[1.0, 2.0], &[5.0, 9.0]));
        assert_ne!(first.id(), second.id());
        assert_eq!(second.spec().points(), vec![[1.0, 5.0], [2.0, 9.0]]);
    }

    #[test]
    fn test_destroy_drops_plot_memory() {
        let ctx = Context::default();
        let mut backend = PlotBackend::new(ctx.clone());
        let chart = backend.create(spec(&[1.0, 2.0, 3.0], &[0.1, 0.2, 0.3]));
        let id = chart.id();

        draw(&ctx, &chart);
        assert!(PlotMemory::load(&ctx, id).is_some());

        backend.destroy(chart);
        assert!(PlotMemory::load(&ctx, id).is_none());
    }

    #[test]
    fn test_drawn_y_axis_starts_at_zero() {
        let ctx = Context::default();
        let mut backend = PlotBackend::new(ctx.clone());
        let chart = backend.create(spec(&[1.0, 2.0, 3.0], &[0.1, 0.2, 0.3]));

        for _ in 0..3 {
            draw(&ctx, &chart);
        }

        let memory = PlotMemory::load(&ctx, chart.id()).expect("Plot should store its memory");
        let bounds = memory.bounds();
        assert_eq!(bounds.min()[1], 0.0);
        assert!(bounds.max()[1] >= 0.3);
        assert!(bounds.min()[0] <= 1.0);
        assert!(bounds.max()[0] >= 3.0);
    }
}
