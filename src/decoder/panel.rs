use super::target::{decode_alert, decode_loki, decode_target};
use super::value::*;
use crate::model::{PanelLink, ThresholdStep};
use crate::panel::axis::Axis;
use crate::panel::graph::{DrawMode, NullValue, SeriesOverride};
use crate::panel::mapping::Mapping;
use crate::panel::table::Aggregation;
use crate::panel::timeseries::{self, BarAlignment, Override, Scale};
use crate::panel::{
    graph, CommonOptions, Gauge, Graph, Heatmap, IntoPanel, Logs, PanelDraft, RepeatDirection,
    SingleStat, Stat, Table, Text, TimeSeries, WithTargets,
};
use crate::{Error, Result};
use yaml_rust::Yaml;

const PANEL_KINDS: [&str; 9] = [
    "graph",
    "timeseries",
    "table",
    "single_stat",
    "stat",
    "text",
    "heatmap",
    "logs",
    "gauge",
];

/// Decodes one `panels` entry of a row. Panels without a `datasource` key use
/// `datasource` when one is given.
pub(super) fn decode_panel(v: &Yaml, path: &str, datasource: Option<&str>) -> Result<PanelDraft> {
    let (kind, v, path) = variant(v, path, &PANEL_KINDS)?;
    let title = required_string(v, &path, "title")?;
    let inherit = match datasource {
        Some(name) if lookup(v, "datasource").is_none() => Some(name),
        _ => None,
    };

    let draft = match kind {
        "graph" => finish(decode_graph(v, &path, &title)?, inherit),
        "timeseries" => finish(decode_timeseries(v, &path, &title)?, inherit),
        "table" => finish(decode_table(v, &path, &title)?, inherit),
        "single_stat" => finish(decode_single_stat(v, &path, &title)?, inherit),
        "stat" => finish(decode_stat(v, &path, &title)?, inherit),
        "text" => finish(decode_text(v, &path, &title)?, inherit),
        "heatmap" => finish(decode_heatmap(v, &path, &title)?, inherit),
        "logs" => finish(decode_logs(v, &path, &title)?, inherit),
        _ => finish(decode_gauge(v, &path, &title)?, inherit),
    };
    located(draft, &path)
}

fn finish<P>(panel: P, datasource: Option<&str>) -> Result<PanelDraft>
where
    P: CommonOptions + IntoPanel,
{
    match datasource {
        Some(name) => panel.datasource(name).into_panel(),
        None => panel.into_panel(),
    }
}

/// Keys shared by every panel kind. Anything else is unknown.
fn common<P: CommonOptions>(panel: P, key: &str, v: &Yaml, path: &str) -> Result<P> {
    Ok(match key {
        "title" => panel,
        "description" => panel.description(as_string(v, path)?),
        "span" => panel.span(as_f32(v, path)?),
        "height" => panel.height(as_string(v, path)?),
        "transparent" => flag(panel, v, path, P::transparent)?,
        "datasource" => panel.datasource(as_string(v, path)?),
        "repeat" => panel.repeat(as_string(v, path)?),
        "repeat_direction" => panel.repeat_direction(match as_string(v, path)?.as_str() {
            "horizontal" => RepeatDirection::Horizontal,
            "vertical" => RepeatDirection::Vertical,
            other => {
                return Err(Error::decode(
                    path,
                    format!("unknown repeat direction '{}'", other),
                ))
            }
        }),
        "links" => panel.links(decode_links(v, path)?),
        _ => return Err(unknown_key(path)),
    })
}

fn decode_links(v: &Yaml, path: &str) -> Result<Vec<PanelLink>> {
    let mut links = Vec::new();
    for (item, path) in items(v, path)? {
        let mut link = PanelLink {
            title: required_string(item, &path, "title")?,
            url: required_string(item, &path, "url")?,
            target_blank: false,
        };
        for (key, value, path) in entries(item, &path)? {
            match key {
                "title" | "url" => {}
                "open_in_new_tab" => link.target_blank = as_bool(value, &path)?,
                _ => return Err(unknown_key(&path)),
            }
        }
        links.push(link);
    }
    Ok(links)
}

fn with_targets<P: WithTargets>(mut panel: P, v: &Yaml, path: &str) -> Result<P> {
    for (target, path) in items(v, path)? {
        panel = panel.with_target(decode_target(target, &path)?);
    }
    Ok(panel)
}

/// `[{color: green}, {color: red, value: 80}]`
fn threshold_steps(v: &Yaml, path: &str) -> Result<Vec<ThresholdStep>> {
    let mut steps = Vec::new();
    for (item, path) in items(v, path)? {
        let color = required_string(item, &path, "color")?;
        let mut value = None;
        for (key, v, path) in entries(item, &path)? {
            match key {
                "color" => {}
                "value" => value = Some(as_f64(v, &path)?),
                _ => return Err(unknown_key(&path)),
            }
        }
        steps.push(match value {
            Some(value) => ThresholdStep::at(color, value),
            None => ThresholdStep::base(color),
        });
    }
    Ok(steps)
}

fn optional_f64(v: &Yaml, path: &str) -> Result<Option<f64>> {
    match v {
        Yaml::Null => Ok(None),
        _ => as_f64(v, path).map(Some),
    }
}

/// `[{value: "1", text: up}, {range: [0, 50], text: low}, {special: null, text: N/A}]`
fn decode_mappings(v: &Yaml, path: &str) -> Result<Vec<Mapping>> {
    let mut mappings = Vec::new();
    for (item, path) in items(v, path)? {
        let text = required_string(item, &path, "text")?;
        let mut mapping = None;
        let mut color = None;
        for (key, value, path) in entries(item, &path)? {
            match key {
                "text" => {}
                "color" => color = Some(as_string(value, &path)?),
                "value" => mapping = Some(Mapping::value(as_string(value, &path)?, &text)),
                "regex" => mapping = Some(Mapping::regex(as_string(value, &path)?, &text)),
                "special" => {
                    // `special: null` loads as a YAML null.
                    let special = match value {
                        Yaml::Null => "null".to_string(),
                        _ => as_string(value, &path)?,
                    };
                    let special = special.parse().map_err(|e: String| Error::decode(&path, e))?;
                    mapping = Some(Mapping::special(special, &text));
                }
                "range" => {
                    let bounds = items(value, &path)?;
                    let [(from, from_path), (to, to_path)] = bounds.as_slice() else {
                        return Err(Error::decode(path, "expected two bounds"));
                    };
                    mapping = Some(Mapping::range(
                        optional_f64(from, from_path)?,
                        optional_f64(to, to_path)?,
                        &text,
                    ));
                }
                _ => return Err(unknown_key(&path)),
            }
        }
        let Some(mapping) = mapping else {
            return Err(Error::decode(
                path,
                "expected one of: value, range, regex, special",
            ));
        };
        mappings.push(match color {
            Some(color) => mapping.color(color),
            None => mapping,
        });
    }
    Ok(mappings)
}

fn decode_axis(v: &Yaml, path: &str) -> Result<Axis> {
    let mut axis = Axis::new();
    for (key, value, path) in entries(v, path)? {
        axis = match key {
            "hidden" => flag(axis, value, &path, Axis::hide)?,
            "label" => axis.label(as_string(value, &path)?),
            "unit" => axis.unit(as_string(value, &path)?),
            "min" => axis.min(as_f64(value, &path)?),
            "max" => axis.max(as_f64(value, &path)?),
            "decimals" => axis.decimals(as_u32(value, &path)?),
            "log_base" => axis.log_base(as_u32(value, &path)?),
            _ => return Err(unknown_key(&path)),
        };
    }
    Ok(axis)
}

fn decode_graph(v: &Yaml, path: &str, title: &str) -> Result<Graph> {
    let mut panel = Graph::new(title);
    for (key, value, path) in entries(v, path)? {
        panel = match key {
            "targets" => with_targets(panel, value, &path)?,
            "alert" => panel.alert(decode_alert(value, &path, title)?),
            "legend" => {
                let mut options = Vec::new();
                for (option, path) in items(value, &path)? {
                    options.push(parse::<graph::LegendOption>(option, &path)?);
                }
                panel.legend(&options)
            }
            "draw" => {
                let mut modes = Vec::new();
                for (mode, path) in items(value, &path)? {
                    modes.push(match as_string(mode, &path)?.as_str() {
                        "lines" => DrawMode::Lines,
                        "bars" => DrawMode::Bars,
                        "points" => DrawMode::Points,
                        other => {
                            return Err(Error::decode(
                                path,
                                format!("unknown draw mode '{}'", other),
                            ))
                        }
                    });
                }
                panel.draw(&modes)
            }
            "null_value" => panel.null(parse::<NullValue>(value, &path)?),
            "fill" => panel.fill(as_u32(value, &path)?),
            "line_width" => panel.line_width(as_u32(value, &path)?),
            "point_radius" => panel.point_radius(as_f32(value, &path)?),
            "staircase" => flag(panel, value, &path, Graph::staircase)?,
            "stack" => flag(panel, value, &path, Graph::stack)?,
            "axes" => {
                let mut panel = panel;
                for (side, axis, path) in entries(value, &path)? {
                    let axis = decode_axis(axis, &path)?;
                    panel = match side {
                        "left" => panel.left_y_axis(axis),
                        "right" => panel.right_y_axis(axis),
                        "bottom" => panel.x_axis(axis),
                        _ => return Err(unknown_key(&path)),
                    };
                }
                panel
            }
            "series_overrides" => {
                let mut panel = panel;
                for (item, path) in items(value, &path)? {
                    let mut series = SeriesOverride::new(required_string(item, &path, "alias")?);
                    for (key, value, path) in entries(item, &path)? {
                        series = match key {
                            "alias" => series,
                            "color" => series.color(as_string(value, &path)?),
                            "dashes" => series.dashes(as_bool(value, &path)?),
                            "lines" => series.lines(as_bool(value, &path)?),
                            "fill" => series.fill(as_u32(value, &path)?),
                            "line_width" => series.line_width(as_u32(value, &path)?),
                            _ => return Err(unknown_key(&path)),
                        };
                    }
                    panel = panel.series_override(series);
                }
                panel
            }
            _ => common(panel, key, value, &path)?,
        };
    }
    Ok(panel)
}

fn decode_timeseries_axis(v: &Yaml, path: &str) -> Result<timeseries::Axis> {
    let mut axis = timeseries::Axis::new();
    for (key, value, path) in entries(v, path)? {
        axis = match key {
            "display" => axis.placement(parse(value, &path)?),
            "soft_min" => axis.soft_min(as_f64(value, &path)?),
            "soft_max" => axis.soft_max(as_f64(value, &path)?),
            "min" => axis.min(as_f64(value, &path)?),
            "max" => axis.max(as_f64(value, &path)?),
            "unit" => axis.unit(as_string(value, &path)?),
            "label" => axis.label(as_string(value, &path)?),
            "decimals" => axis.decimals(as_u32(value, &path)?),
            "scale" => axis.scale(match as_string(value, &path)?.as_str() {
                "linear" => Scale::Linear,
                "log2" => Scale::Log2,
                "log10" => Scale::Log10,
                other => return Err(Error::decode(path, format!("unknown scale '{}'", other))),
            }),
            _ => return Err(unknown_key(&path)),
        };
    }
    Ok(axis)
}

fn decode_override(v: &Yaml, path: &str) -> Result<Override> {
    let matcher = match lookup(v, "match") {
        Some(matcher) => matcher,
        None => return Err(Error::decode(child(path, "match"), "missing required key")),
    };
    let (kind, name, match_path) =
        variant(matcher, &child(path, "match"), &["field_name", "query_ref"])?;
    let name = as_string(name, &match_path)?;
    let mut field_override = match kind {
        "field_name" => Override::by_name(name),
        _ => Override::by_query(name),
    };

    for (key, value, path) in entries(v, path)? {
        match key {
            "match" => {}
            "properties" => {
                for (key, value, path) in entries(value, &path)? {
                    field_override = match key {
                        "unit" => field_override.unit(as_string(value, &path)?),
                        "color" => field_override.fixed_color(as_string(value, &path)?),
                        "fill_opacity" => field_override.fill_opacity(as_u32(value, &path)?),
                        "negative_y" => flag(field_override, value, &path, Override::negative_y)?,
                        "axis_display" => field_override.axis_placement(parse(value, &path)?),
                        "stack" => field_override.stack(parse(value, &path)?),
                        _ => return Err(unknown_key(&path)),
                    };
                }
            }
            _ => return Err(unknown_key(&path)),
        }
    }
    Ok(field_override)
}

fn decode_timeseries(v: &Yaml, path: &str, title: &str) -> Result<TimeSeries> {
    let mut panel = TimeSeries::new(title);
    for (key, value, path) in entries(v, path)? {
        panel = match key {
            "targets" => with_targets(panel, value, &path)?,
            "alert" => panel.alert(decode_alert(value, &path, title)?),
            "legend" => {
                let mut options = Vec::new();
                for (option, path) in items(value, &path)? {
                    options.push(parse::<timeseries::LegendOption>(option, &path)?);
                }
                panel.legend(&options)
            }
            "visualization" => {
                let mut panel = panel;
                for (key, value, path) in entries(value, &path)? {
                    panel = match key {
                        "gradient_mode" => panel.gradient(parse(value, &path)?),
                        "tooltip" => panel.tooltip(parse(value, &path)?),
                        "stack" => panel.stack(parse(value, &path)?),
                        "fill_opacity" => panel.fill_opacity(as_u32(value, &path)?),
                        "point_size" => panel.point_size(as_u32(value, &path)?),
                        "line_width" => panel.line_width(as_u32(value, &path)?),
                        "line_interpolation" => panel.lines(parse(value, &path)?),
                        "bars" => panel.bars(match as_string(value, &path)?.as_str() {
                            "before" => BarAlignment::Before,
                            "center" => BarAlignment::Center,
                            "after" => BarAlignment::After,
                            other => {
                                return Err(Error::decode(
                                    path,
                                    format!("unknown bar alignment '{}'", other),
                                ))
                            }
                        }),
                        "points" => flag(panel, value, &path, TimeSeries::points)?,
                        _ => return Err(unknown_key(&path)),
                    };
                }
                panel
            }
            "axis" => panel.axis(decode_timeseries_axis(value, &path)?),
            "thresholds" => panel.thresholds(threshold_steps(value, &path)?),
            "thresholds_style" => panel.thresholds_style(parse(value, &path)?),
            "overrides" => {
                let mut panel = panel;
                for (item, path) in items(value, &path)? {
                    panel = panel.field_override(decode_override(item, &path)?);
                }
                panel
            }
            _ => common(panel, key, value, &path)?,
        };
    }
    Ok(panel)
}

fn decode_table(v: &Yaml, path: &str, title: &str) -> Result<Table> {
    let mut panel = Table::new(title);
    for (key, value, path) in entries(v, path)? {
        panel = match key {
            "targets" => with_targets(panel, value, &path)?,
            "hidden_columns" => {
                let mut panel = panel;
                for pattern in as_string_list(value, &path)? {
                    panel = panel.hide_column(pattern);
                }
                panel
            }
            "time_series_aggregations" => {
                let mut aggregations = Vec::new();
                for (item, path) in items(value, &path)? {
                    let label = required_string(item, &path, "label")?;
                    let aggregation = match lookup(item, "type") {
                        Some(kind) => parse(kind, &child(&path, "type"))?,
                        None => {
                            return Err(Error::decode(child(&path, "type"), "missing required key"))
                        }
                    };
                    for (key, _, path) in entries(item, &path)? {
                        if key != "label" && key != "type" {
                            return Err(unknown_key(&path));
                        }
                    }
                    aggregations.push(Aggregation::new(label, aggregation));
                }
                panel.as_time_series_aggregations(aggregations)
            }
            "time_series_to_columns" => {
                flag(panel, value, &path, Table::as_time_series_to_columns)?
            }
            _ => common(panel, key, value, &path)?,
        };
    }
    Ok(panel)
}

fn decode_single_stat(v: &Yaml, path: &str, title: &str) -> Result<SingleStat> {
    let mut panel = SingleStat::new(title);
    for (key, value, path) in entries(v, path)? {
        panel = match key {
            "targets" => with_targets(panel, value, &path)?,
            "unit" => panel.unit(as_string(value, &path)?),
            "decimals" => panel.decimals(as_u32(value, &path)?),
            "value_type" => panel.value_type(parse(value, &path)?),
            "value_font_size" => panel.value_font_size(as_string(value, &path)?),
            "prefix" => panel.prefix(as_string(value, &path)?),
            "prefix_font_size" => panel.prefix_font_size(as_string(value, &path)?),
            "postfix" => panel.postfix(as_string(value, &path)?),
            "postfix_font_size" => panel.postfix_font_size(as_string(value, &path)?),
            "sparkline" => match as_string(value, &path)?.as_str() {
                "bottom" => panel.sparkline(),
                "full" => panel.full_sparkline(),
                other => {
                    return Err(Error::decode(
                        path,
                        format!("unknown sparkline mode '{}'", other),
                    ))
                }
            },
            "sparkline_y_min" => panel.sparkline_y_min(as_f64(value, &path)?),
            "sparkline_y_max" => panel.sparkline_y_max(as_f64(value, &path)?),
            "color" => {
                let mut panel = panel;
                for (target, path) in items(value, &path)? {
                    panel = match as_string(target, &path)?.as_str() {
                        "value" => panel.color_value(),
                        "background" => panel.color_background(),
                        other => {
                            return Err(Error::decode(
                                path,
                                format!("unknown color target '{}'", other),
                            ))
                        }
                    };
                }
                panel
            }
            "thresholds" => {
                let bounds = items(value, &path)?;
                let [(low, low_path), (high, high_path)] = bounds.as_slice() else {
                    return Err(Error::decode(path, "expected two thresholds"));
                };
                panel.thresholds(as_f64(low, low_path)?, as_f64(high, high_path)?)
            }
            "colors" => {
                let colors = as_string_list(value, &path)?;
                let [ok, warning, critical] = colors.as_slice() else {
                    return Err(Error::decode(path, "expected three colors"));
                };
                panel.colors([ok.as_str(), warning.as_str(), critical.as_str()])
            }
            "values_to_text" => panel.values_to_text(as_string_pairs(value, &path)?),
            "ranges_to_text" => {
                let mut ranges = Vec::new();
                for (item, path) in items(value, &path)? {
                    let from = match lookup(item, "from") {
                        Some(from) => as_f64(from, &child(&path, "from"))?,
                        None => {
                            return Err(Error::decode(child(&path, "from"), "missing required key"))
                        }
                    };
                    let to = match lookup(item, "to") {
                        Some(to) => as_f64(to, &child(&path, "to"))?,
                        None => {
                            return Err(Error::decode(child(&path, "to"), "missing required key"))
                        }
                    };
                    let text = required_string(item, &path, "text")?;
                    for (key, _, path) in entries(item, &path)? {
                        if !["from", "to", "text"].contains(&key) {
                            return Err(unknown_key(&path));
                        }
                    }
                    ranges.push((from, to, text));
                }
                panel.ranges_to_text(ranges)
            }
            _ => common(panel, key, value, &path)?,
        };
    }
    Ok(panel)
}

fn decode_stat(v: &Yaml, path: &str, title: &str) -> Result<Stat> {
    let mut panel = Stat::new(title);
    for (key, value, path) in entries(v, path)? {
        panel = match key {
            "targets" => with_targets(panel, value, &path)?,
            "unit" => panel.unit(as_string(value, &path)?),
            "decimals" => panel.decimals(as_u32(value, &path)?),
            "value_type" => panel.value_type(parse(value, &path)?),
            "text" => panel.text(parse(value, &path)?),
            "color_mode" => panel.color_mode(parse(value, &path)?),
            "orientation" => panel.orientation(parse(value, &path)?),
            "sparkline" => flag(panel, value, &path, Stat::sparkline)?,
            "sparkline_y_min" => panel.sparkline_y_min(as_f64(value, &path)?),
            "sparkline_y_max" => panel.sparkline_y_max(as_f64(value, &path)?),
            "value_font_size" => panel.value_font_size(as_u32(value, &path)?),
            "title_font_size" => panel.title_font_size(as_u32(value, &path)?),
            "no_value" => panel.no_value(as_string(value, &path)?),
            "thresholds" => panel.absolute_thresholds(threshold_steps(value, &path)?),
            "relative_thresholds" => panel.relative_thresholds(threshold_steps(value, &path)?),
            "value_mappings" => panel.mappings(decode_mappings(value, &path)?),
            _ => common(panel, key, value, &path)?,
        };
    }
    Ok(panel)
}

fn decode_gauge(v: &Yaml, path: &str, title: &str) -> Result<Gauge> {
    let mut panel = Gauge::new(title);
    for (key, value, path) in entries(v, path)? {
        panel = match key {
            "targets" => with_targets(panel, value, &path)?,
            "unit" => panel.unit(as_string(value, &path)?),
            "decimals" => panel.decimals(as_u32(value, &path)?),
            "value_type" => panel.value_type(parse(value, &path)?),
            "orientation" => panel.orientation(parse(value, &path)?),
            "min" => panel.min(as_f64(value, &path)?),
            "max" => panel.max(as_f64(value, &path)?),
            "value_font_size" => panel.value_font_size(as_u32(value, &path)?),
            "title_font_size" => panel.title_font_size(as_u32(value, &path)?),
            "threshold_labels" => flag(panel, value, &path, Gauge::threshold_labels)?,
            "hide_threshold_markers" => flag(panel, value, &path, Gauge::hide_threshold_markers)?,
            "thresholds" => panel.absolute_thresholds(threshold_steps(value, &path)?),
            "relative_thresholds" => panel.relative_thresholds(threshold_steps(value, &path)?),
            _ => common(panel, key, value, &path)?,
        };
    }
    Ok(panel)
}

fn decode_text(v: &Yaml, path: &str, title: &str) -> Result<Text> {
    let mut panel = Text::new(title);
    for (key, value, path) in entries(v, path)? {
        panel = match key {
            "markdown" => panel.markdown(as_string(value, &path)?),
            "html" => panel.html(as_string(value, &path)?),
            _ => common(panel, key, value, &path)?,
        };
    }
    Ok(panel)
}

fn decode_heatmap(v: &Yaml, path: &str, title: &str) -> Result<Heatmap> {
    let mut panel = Heatmap::new(title);
    for (key, value, path) in entries(v, path)? {
        panel = match key {
            "targets" => with_targets(panel, value, &path)?,
            "data_format" => panel.data_format(parse(value, &path)?),
            "show_zero_buckets" => flag(panel, value, &path, Heatmap::show_zero_buckets)?,
            "no_highlight_cards" => flag(panel, value, &path, Heatmap::no_highlight_cards)?,
            "reverse_y_buckets" => flag(panel, value, &path, Heatmap::reverse_y_buckets)?,
            "hide_legend" => flag(panel, value, &path, Heatmap::hide_legend)?,
            "hide_tooltip" => flag(panel, value, &path, Heatmap::hide_tooltip)?,
            "hide_tooltip_histogram" => {
                flag(panel, value, &path, Heatmap::hide_tooltip_histogram)?
            }
            "tooltip_decimals" => panel.tooltip_decimals(as_u32(value, &path)?),
            "hide_x_axis" => flag(panel, value, &path, Heatmap::hide_x_axis)?,
            "y_axis" => panel.y_axis(decode_axis(value, &path)?),
            _ => common(panel, key, value, &path)?,
        };
    }
    Ok(panel)
}

fn decode_logs(v: &Yaml, path: &str, title: &str) -> Result<Logs> {
    let mut panel = Logs::new(title);
    for (key, value, path) in entries(v, path)? {
        panel = match key {
            "targets" => {
                let mut panel = panel;
                for (target, path) in items(value, &path)? {
                    let (_, target, path) = variant(target, &path, &["loki"])?;
                    panel = panel.with_target(decode_loki(target, &path)?);
                }
                panel
            }
            "time" => flag(panel, value, &path, Logs::time)?,
            "unique_labels" => flag(panel, value, &path, Logs::unique_labels)?,
            "common_labels" => flag(panel, value, &path, Logs::common_labels)?,
            "wrap_lines" => flag(panel, value, &path, Logs::wrap_lines)?,
            "prettify_json" => flag(panel, value, &path, Logs::prettify_json)?,
            "disable_log_details" => flag(panel, value, &path, Logs::disable_log_details)?,
            "order" => panel.order(parse(value, &path)?),
            "dedup" => panel.dedup(parse(value, &path)?),
            _ => common(panel, key, value, &path)?,
        };
    }
    Ok(panel)
}
