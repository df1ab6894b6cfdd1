use super::super::*;
use crate::{config::DiagramConfig, model::AbstractCurve};
use test_log::test;

fn draw(description: &str) -> ConcreteDiagram {
    let config = DiagramConfig { parallel: false, ..DiagramConfig::default() };
    crate::draw(description, 400., &config).unwrap()
}

fn assert_centers_inside(diagram: &ConcreteDiagram) {
    for zone in diagram.zones() {
        assert!(!zone.is_empty(), "{} was claimed but not drawn", zone);
        let center = zone.center().unwrap();
        assert!(zone.shape().contains(&center), "center {} of {} is outside it", center, zone);
    }
}

#[test]
fn nested_chain() {
    let diagram = draw("a ab abc");
    assert_eq!(diagram.contours().len(), 3);
    assert_centers_inside(&diagram);
    let a = diagram.contour(&AbstractCurve::new('a')).unwrap().as_circle().unwrap();
    let c = diagram.contour(&AbstractCurve::new('c')).unwrap().as_circle().unwrap();
    assert!(c.r < a.r);
    let in_c: Vec<String> = diagram.zones_containing_contour(&AbstractCurve::new('c')).iter().map(|z| z.zone.label()).collect();
    assert_eq!(in_c, vec!["abc"]);
}

#[test]
fn disjoint() {
    let diagram = draw("a b c");
    assert_eq!(diagram.contours().len(), 3);
    assert_centers_inside(&diagram);
    assert!(diagram.find_duplicate_contours().is_empty());
    let outside = diagram.outside_zone();
    assert!(outside.containing.is_empty());
    assert_eq!(outside.excluding.len(), 3);
}

#[test]
fn resized() {
    let mut diagram = draw("a b ab");
    diagram.set_size(1000.);
    assert_centers_inside(&diagram);
    for contour in diagram.contours() {
        let b = contour.bounds();
        assert!(b.x >= 0. && b.y >= 0. && b.max_x() <= 1000. && b.max_y() <= 1000., "{:?}", b);
    }
}

#[test]
fn view() {
    let diagram = draw("a b ab");
    let view = diagram.view();
    assert_eq!(view.contours.len(), 2);
    let labels: Vec<&str> = view.zones.iter().map(|z| z.label.as_str()).collect();
    assert_eq!(labels, vec!["", "a", "b", "ab"]);
    assert!(view.zones.iter().all(|z| !z.shaded && z.center.is_some() && !z.polygons.is_empty()));
}
