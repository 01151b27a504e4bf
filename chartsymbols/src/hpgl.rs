//! A small subset of HPGL, enough to turn S-52 vector symbols into MapServer `VECTOR` symbols.
//!
//! Coordinates are in units of 0.01 mm. Supported commands are `SP` (select pen), `SW` (pen
//! width), `PU` (pen up), `PD` (pen down) and `CI` (circle); everything else (fills, polygon
//! mode, transparency) is ignored.

use std::fmt::Write;

/// MapServer's pen-up marker inside `POINTS`.
const PEN_UP: &str = "-99 -99";

/// Symbol units per pixel; S-52 assumes a 0.32 mm pixel.
const UNITS_PER_PIXEL: f64 = 32.0;

const CIRCLE_SEGMENTS: usize = 16;

/// One continuous pen-down path.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub pen: char,
    pub width: u32,
    pub points: Vec<(i32, i32)>,
}

fn parse_numbers(args: &str) -> Vec<i32> {
    args.split(',')
        .filter_map(|n| n.trim().parse::<f64>().ok())
        .map(|n| n.round() as i32)
        .collect()
}

fn circle(center: (i32, i32), radius: i32) -> Vec<(i32, i32)> {
    (0..=CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / CIRCLE_SEGMENTS as f64;
            (
                center.0 + (radius as f64 * angle.cos()).round() as i32,
                center.1 + (radius as f64 * angle.sin()).round() as i32,
            )
        })
        .collect()
}

pub fn parse(hpgl: &str) -> Vec<Stroke> {
    let mut strokes = Vec::new();
    let mut pen = 'A';
    let mut width = 1;
    let mut position = (0, 0);
    let mut current: Option<Stroke> = None;

    let finish = |current: &mut Option<Stroke>, strokes: &mut Vec<Stroke>| {
        if let Some(stroke) = current.take() {
            if stroke.points.len() > 1 {
                strokes.push(stroke);
            }
        }
    };

    for command in hpgl.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        let (Some(op), Some(args)) = (command.get(..2), command.get(2..)) else {
            log::trace!("ignoring HPGL command {command}");
            continue;
        };
        match op {
            "SP" => {
                finish(&mut current, &mut strokes);
                pen = args.chars().next().unwrap_or('A');
            }
            "SW" => {
                finish(&mut current, &mut strokes);
                width = args.trim().parse().unwrap_or(1);
            }
            "PU" => {
                finish(&mut current, &mut strokes);
                let numbers = parse_numbers(args);
                if let [.., x, y] = numbers[..] {
                    position = (x, y);
                }
            }
            "PD" => {
                let stroke = current.get_or_insert_with(|| Stroke {
                    pen,
                    width,
                    points: vec![position],
                });
                let numbers = parse_numbers(args);
                if numbers.is_empty() {
                    // a dot
                    stroke.points.push(position);
                }
                for pair in numbers.chunks_exact(2) {
                    position = (pair[0], pair[1]);
                    stroke.points.push(position);
                }
            }
            "CI" => {
                finish(&mut current, &mut strokes);
                if let Some(&radius) = parse_numbers(args).first() {
                    strokes.push(Stroke {
                        pen,
                        width,
                        points: circle(position, radius),
                    });
                }
            }
            _ => log::trace!("ignoring HPGL command {command}"),
        }
    }
    finish(&mut current, &mut strokes);
    strokes
}

/// Render strokes as the body of a MapServer `POINTS` block, relative to `pivot` and scaled to
/// pixels.
pub fn to_mapfile_points(strokes: &[Stroke], pivot: (i32, i32)) -> String {
    let mut points = String::new();
    for (i, stroke) in strokes.iter().enumerate() {
        if i > 0 {
            points.push_str(PEN_UP);
            points.push(' ');
        }
        for (x, y) in &stroke.points {
            let x = (x - pivot.0) as f64 / UNITS_PER_PIXEL;
            let y = (y - pivot.1) as f64 / UNITS_PER_PIXEL;
            write!(points, "{} {} ", format_coord(x), format_coord(y)).ok();
        }
    }
    points.trim_end().to_owned()
}

fn format_coord(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        rounded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pen_moves_into_strokes() {
        let strokes = parse("SPA;SW1;PU0,0;PD100,0,100,100;SPB;PU0,200;PD300,200");
        assert_eq!(
            strokes,
            vec![
                Stroke {
                    pen: 'A',
                    width: 1,
                    points: vec![(0, 0), (100, 0), (100, 100)],
                },
                Stroke {
                    pen: 'B',
                    width: 1,
                    points: vec![(0, 200), (300, 200)],
                },
            ]
        );
    }

    #[test]
    fn single_pen_down_is_a_dot() {
        let strokes = parse("SPA;SW2;PU50,50;PD;");
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].points, vec![(50, 50), (50, 50)]);
        assert_eq!(strokes[0].width, 2);
    }

    #[test]
    fn circle_is_closed() {
        let strokes = parse("SPA;PU100,100;CI50");
        let points = &strokes[0].points;
        assert_eq!(points.len(), CIRCLE_SEGMENTS + 1);
        assert_eq!(points.first(), points.last());
        assert_eq!(points[0], (150, 100));
    }

    #[test]
    fn unknown_commands_are_ignored() {
        let strokes = parse("SPA;ST0;PM0;PU0,0;PD32,0;PM2;FP");
        assert_eq!(strokes.len(), 1);
    }

    #[test]
    fn commands_split_inside_a_character_are_skipped() {
        let strokes = parse("SPA;Xé;é;P;PU0,0;PD10,10");
        assert_eq!(
            strokes,
            vec![Stroke {
                pen: 'A',
                width: 1,
                points: vec![(0, 0), (10, 10)],
            }]
        );
    }

    #[test]
    fn mapfile_points_are_relative_to_pivot() {
        let strokes = parse("SPA;PU32,32;PD64,32;PU0,0;PD0,64");
        let points = to_mapfile_points(&strokes, (32, 32));
        assert_eq!(points, "0 0 1 0 -99 -99 -1 -1 -1 1");
    }
}
