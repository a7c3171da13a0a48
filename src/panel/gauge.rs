use super::options::{Orientation, ValueType};
use super::scheme::{ColorScheme, SeriesBy};
use super::threshold::thresholds;
use super::{CommonOptions, IntoPanel, PanelBase, PanelDraft, WithTargets};
use crate::kernel::Builder;
use crate::model::{
    FieldConfig, FieldDefaults, GaugeOptions, GaugePanel, PanelKind, ReduceOptions, TextSizes,
    ThresholdMode, ThresholdStep,
};
use crate::Result;

#[derive(Debug)]
pub struct Gauge {
    base: PanelBase,
    options: GaugeOptions,
    defaults: FieldDefaults,
}

impl Builder for Gauge {}

impl CommonOptions for Gauge {
    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }
}

impl WithTargets for Gauge {}

impl Gauge {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            base: PanelBase::new("gauge", title),
            options: GaugeOptions {
                reduce_options: ReduceOptions::default(),
                orientation: String::new(),
                show_threshold_labels: false,
                show_threshold_markers: true,
                text: TextSizes::default(),
            },
            defaults: FieldDefaults {
                no_value: Some("N/A".to_string()),
                ..Default::default()
            },
        }
        .span(6.0)
        .value_type(ValueType::LastNonNull)
        .orientation(Orientation::Vertical)
        .color_scheme(ColorScheme::Thresholds(SeriesBy::Last))
        .absolute_thresholds(Vec::new())
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.options.reduce_options.calcs = vec![value_type.as_str().to_string()];
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.options.orientation = orientation.as_str().to_string();
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.defaults.unit = Some(unit.into());
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.defaults.decimals = Some(decimals);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.defaults.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.defaults.max = Some(max);
        self
    }

    pub fn value_font_size(mut self, size: u32) -> Self {
        self.options.text.value_size = Some(size);
        self
    }

    pub fn title_font_size(mut self, size: u32) -> Self {
        self.options.text.title_size = Some(size);
        self
    }

    pub fn threshold_labels(mut self) -> Self {
        self.options.show_threshold_labels = true;
        self
    }

    pub fn hide_threshold_markers(mut self) -> Self {
        self.options.show_threshold_markers = false;
        self
    }

    pub fn absolute_thresholds(self, steps: Vec<ThresholdStep>) -> Self {
        self.thresholds(ThresholdMode::Absolute, steps)
    }

    pub fn relative_thresholds(self, steps: Vec<ThresholdStep>) -> Self {
        self.thresholds(ThresholdMode::Percentage, steps)
    }

    fn thresholds(mut self, mode: ThresholdMode, steps: Vec<ThresholdStep>) -> Self {
        let resource = self.base.resource();
        if let Some(thresholds) = self.base.take(thresholds(&resource, mode, steps)) {
            self.defaults.thresholds = Some(thresholds);
        }
        self
    }

    pub fn color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.defaults.color = Some(scheme.to_field_color());
        self
    }
}

impl IntoPanel for Gauge {
    fn into_panel(self) -> Result<PanelDraft> {
        let panel = self.base.finish(PanelKind::Gauge(GaugePanel {
            options: self.options,
            field_config: FieldConfig {
                defaults: self.defaults,
                overrides: Vec::new(),
            },
        }))?;
        Ok(PanelDraft { panel, alert: None })
    }
}
