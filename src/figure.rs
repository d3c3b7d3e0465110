//! Plotly figure assembly.
//!
//! Turns an [`AnimationSequence`] into the JSON figure description consumed
//! by plotly.js: `scattergeo` traces, animation frames, a play button and a
//! date slider.

use serde::Serialize;

use crate::frames::{AnimationSequence, MarkerLayer};

/// Presentation settings for the figure.
#[derive(Debug, Clone)]
pub struct FigureOptions {
    pub title: String,
    pub font_family: String,
    pub font_size: u32,
    /// Frame and transition duration while playing, in milliseconds.
    pub play_duration_ms: u32,
    /// Frame and transition duration when jumping via the slider.
    pub step_duration_ms: u32,
    pub slider_transition_ms: u32,
    pub easing: String,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            title: "<b> COVID-19 Total Cases </b> <BR>".to_string(),
            font_family: "Arial".to_string(),
            font_size: 14,
            play_duration_ms: 200,
            step_duration_ms: 100,
            slider_transition_ms: 300,
            easing: "quad-in".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub frames: Vec<FigureFrame>,
}

#[derive(Debug, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub locationmode: &'static str,
    pub locations: Vec<String>,
    pub marker: Marker,
    pub name: String,
    pub text: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Marker {
    pub size: Vec<f64>,
    pub color: String,
    pub line: MarkerLine,
    pub sizemode: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MarkerLine {
    pub color: &'static str,
    pub width: f64,
}

#[derive(Debug, Serialize)]
pub struct FigureFrame {
    pub name: String,
    pub data: Vec<Trace>,
}

#[derive(Debug, Serialize)]
pub struct Layout {
    pub title: Title,
    pub showlegend: bool,
    pub geo: Geo,
    pub updatemenus: Vec<UpdateMenu>,
    pub sliders: Vec<Slider>,
}

#[derive(Debug, Serialize)]
pub struct Title {
    pub text: String,
    pub font: Font,
}

#[derive(Debug, Serialize)]
pub struct Font {
    pub family: String,
    pub size: u32,
}

#[derive(Debug, Serialize)]
pub struct Geo {
    pub scope: &'static str,
    pub landcolor: &'static str,
    pub coastlinecolor: &'static str,
    pub countrywidth: f64,
    pub countrycolor: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UpdateMenu {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub buttons: Vec<Button>,
}

/// Play button: `args[0]` is `null` so every frame is played.
#[derive(Debug, Serialize)]
pub struct Button {
    pub label: &'static str,
    pub method: &'static str,
    pub args: (Option<Vec<String>>, AnimationOptions),
}

#[derive(Debug, Serialize)]
pub struct AnimationOptions {
    pub frame: FrameTiming,
    pub mode: &'static str,
    pub transition: Transition,
}

#[derive(Debug, Serialize)]
pub struct FrameTiming {
    pub duration: u32,
    pub redraw: bool,
}

#[derive(Debug, Serialize)]
pub struct Transition {
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Slider {
    pub y: u32,
    pub active: usize,
    pub currentvalue: CurrentValue,
    pub transition: Transition,
    pub pad: Pad,
    pub steps: Vec<SliderStep>,
}

#[derive(Debug, Serialize)]
pub struct CurrentValue {
    pub prefix: &'static str,
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct Pad {
    pub t: u32,
}

/// Slider step: `args[0]` names the single frame to jump to.
#[derive(Debug, Serialize)]
pub struct SliderStep {
    pub method: &'static str,
    pub args: (Vec<String>, AnimationOptions),
    pub label: String,
}

impl Trace {
    fn from_layer(layer: &MarkerLayer) -> Self {
        Trace {
            kind: "scattergeo",
            locationmode: "ISO-3",
            locations: layer.locations.clone(),
            marker: Marker {
                size: layer.sizes.clone(),
                color: layer.color.clone(),
                line: MarkerLine {
                    color: "#ffffff",
                    width: 0.5,
                },
                sizemode: "area",
            },
            name: layer.continent.clone(),
            text: layer.text.clone(),
        }
    }
}

fn animation(duration: u32, easing: &str) -> AnimationOptions {
    AnimationOptions {
        frame: FrameTiming {
            duration,
            redraw: true,
        },
        mode: "immediate",
        transition: Transition {
            duration,
            easing: Some(easing.to_string()),
        },
    }
}

impl Figure {
    pub fn from_sequence(sequence: &AnimationSequence, options: &FigureOptions) -> Self {
        let traces = |layers: &[MarkerLayer]| -> Vec<Trace> {
            layers.iter().map(Trace::from_layer).collect()
        };

        let frames = sequence
            .frames
            .iter()
            .map(|f| FigureFrame {
                name: f.name.clone(),
                data: traces(&f.layers),
            })
            .collect();

        let steps = sequence
            .steps
            .iter()
            .map(|s| SliderStep {
                method: "animate",
                args: (
                    vec![s.frame.clone()],
                    animation(options.step_duration_ms, &options.easing),
                ),
                label: s.label.clone(),
            })
            .collect();

        let play = Button {
            label: "Play",
            method: "animate",
            args: (None, animation(options.play_duration_ms, &options.easing)),
        };

        let layout = Layout {
            title: Title {
                text: options.title.clone(),
                font: Font {
                    family: options.font_family.clone(),
                    size: options.font_size,
                },
            },
            showlegend: true,
            geo: Geo {
                scope: "world",
                landcolor: "rgb(217, 217, 217)",
                coastlinecolor: "#ffffff",
                countrywidth: 0.5,
                countrycolor: "#ffffff",
            },
            updatemenus: vec![UpdateMenu {
                kind: "buttons",
                buttons: vec![play],
            }],
            sliders: vec![Slider {
                y: 0,
                active: sequence.steps.len().saturating_sub(1),
                currentvalue: CurrentValue {
                    prefix: "",
                    visible: true,
                },
                transition: Transition {
                    duration: options.slider_transition_ms,
                    easing: None,
                },
                pad: Pad { t: 2 },
                steps,
            }],
        };

        Figure {
            data: traces(&sequence.initial),
            layout,
            frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{Frame, Step};
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    fn layer(continent: &str) -> MarkerLayer {
        MarkerLayer {
            continent: continent.to_string(),
            color: "crimson".to_string(),
            locations: vec!["ATL".to_string()],
            sizes: vec![20.0],
            text: vec!["Atlantis: Total Cases: 4000".to_string()],
        }
    }

    fn sequence() -> AnimationSequence {
        let frame = |d: u32, label: &str| Frame {
            name: label.to_string(),
            date: NaiveDate::from_ymd_opt(2020, 3, d).unwrap(),
            layers: vec![layer("Europe")],
        };
        AnimationSequence {
            frames: vec![frame(1, "01 Mar"), frame(2, "02 Mar")],
            steps: vec![
                Step {
                    label: "01 Mar".to_string(),
                    frame: "01 Mar".to_string(),
                },
                Step {
                    label: "02 Mar".to_string(),
                    frame: "02 Mar".to_string(),
                },
            ],
            initial: vec![layer("Europe")],
        }
    }

    fn to_json() -> Value {
        let figure = Figure::from_sequence(&sequence(), &FigureOptions::default());
        serde_json::to_value(&figure).unwrap()
    }

    #[test]
    fn test_trace_shape() {
        let v = to_json();
        let trace = &v["data"][0];

        assert_eq!(trace["type"], "scattergeo");
        assert_eq!(trace["locationmode"], "ISO-3");
        assert_eq!(trace["name"], "Europe");
        assert_eq!(trace["marker"]["size"], json!([20.0]));
        assert_eq!(trace["marker"]["sizemode"], "area");
        assert_eq!(trace["marker"]["line"], json!({"color": "#ffffff", "width": 0.5}));
    }

    #[test]
    fn test_frames_and_slider() {
        let v = to_json();

        assert_eq!(v["frames"].as_array().unwrap().len(), 2);
        assert_eq!(v["frames"][1]["name"], "02 Mar");

        let slider = &v["layout"]["sliders"][0];
        assert_eq!(slider["active"], 1);
        assert_eq!(slider["steps"][0]["label"], "01 Mar");
        assert_eq!(slider["steps"][0]["args"][0], json!(["01 Mar"]));
        assert_eq!(slider["steps"][0]["args"][1]["frame"]["duration"], 100);
        assert!(slider["transition"].get("easing").is_none());
    }

    #[test]
    fn test_play_button_animates_all_frames() {
        let v = to_json();
        let button = &v["layout"]["updatemenus"][0]["buttons"][0];

        assert_eq!(button["label"], "Play");
        assert_eq!(button["method"], "animate");
        assert!(button["args"][0].is_null());
        assert_eq!(button["args"][1]["transition"]["easing"], "quad-in");
        assert_eq!(button["args"][1]["frame"]["duration"], 200);
    }

    #[test]
    fn test_layout_title() {
        let v = to_json();

        assert_eq!(v["layout"]["title"]["font"]["family"], "Arial");
        assert_eq!(v["layout"]["title"]["font"]["size"], 14);
        assert_eq!(v["layout"]["geo"]["scope"], "world");
    }
}
