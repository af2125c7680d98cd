//! Translation between the grid UI's layout items and widget footprints
//!
//! The interactive grid reports geometry as a list of `{i, x, y, w, h}` items
//! with signed coordinates. Converting into the model clamps negatives to zero
//! and applies the size floor. Items sent back to the UI carry the same floor
//! as `minW`/`minH` so the UI never offers a size the model would refuse.

use grid_model::{SizeConstraints, Widget, WidgetFootprint, WidgetId};
use serde::{Deserialize, Serialize};

/// One cell rectangle as the grid UI describes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    /// Widget id
    pub i: String,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
}

impl LayoutItem {
    /// Describe a widget for the UI, including the size floor
    pub fn from_widget(widget: &Widget, constraints: &SizeConstraints) -> Self {
        let f = widget.footprint;
        Self {
            i: widget.id.to_string(),
            x: i64::from(f.x),
            y: i64::from(f.y),
            w: i64::from(f.w),
            h: i64::from(f.h),
            min_w: Some(constraints.min_w),
            min_h: Some(constraints.min_h),
        }
    }

    pub fn widget_id(&self) -> WidgetId {
        WidgetId::from(self.i.as_str())
    }

    /// Model footprint for this item, with negatives clamped and the floor applied
    pub fn to_footprint(&self, constraints: &SizeConstraints) -> WidgetFootprint {
        constraints.clamp(WidgetFootprint::new(
            to_cells(self.x),
            to_cells(self.y),
            to_cells(self.w),
            to_cells(self.h),
        ))
    }
}

fn to_cells(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// UI items for every widget, in insertion order
pub fn layout_items(widgets: &[Widget], constraints: &SizeConstraints) -> Vec<LayoutItem> {
    widgets
        .iter()
        .map(|widget| LayoutItem::from_widget(widget, constraints))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_model::WidgetKind;
    use proptest::prelude::*;

    fn item(x: i64, y: i64, w: i64, h: i64) -> LayoutItem {
        LayoutItem {
            i: "w1".to_string(),
            x,
            y,
            w,
            h,
            min_w: None,
            min_h: None,
        }
    }

    #[test]
    fn test_from_widget_carries_floor() {
        let widget = Widget::with_id(
            WidgetId::from("w1"),
            WidgetKind::Events,
            WidgetFootprint::new(4, 3, 6, 5),
        );
        let item = LayoutItem::from_widget(&widget, &SizeConstraints::default());
        assert_eq!((item.x, item.y, item.w, item.h), (4, 3, 6, 5));
        assert_eq!((item.min_w, item.min_h), (Some(4), Some(3)));
        assert_eq!(item.widget_id(), WidgetId::from("w1"));
    }

    #[test]
    fn test_negative_geometry_clamped() {
        let footprint = item(-3, -1, -5, 0).to_footprint(&SizeConstraints::default());
        assert_eq!(footprint, WidgetFootprint::new(0, 0, 4, 3));
    }

    #[test]
    fn test_ui_json_shape() {
        let parsed: LayoutItem =
            serde_json::from_str(r#"{"i":"abc","x":2,"y":0,"w":4,"h":3,"moved":false}"#).unwrap();
        assert_eq!(parsed.i, "abc");
        assert_eq!(parsed.min_w, None);

        let json = serde_json::to_value(LayoutItem {
            min_w: Some(4),
            ..parsed
        })
        .unwrap();
        assert_eq!(json["minW"], 4);
        assert!(json.get("minH").is_none());
    }

    proptest! {
        #[test]
        fn converted_items_respect_floor(x in any::<i64>(), y in any::<i64>(), w in -10i64..20, h in -10i64..20) {
            let footprint = item(x, y, w, h).to_footprint(&SizeConstraints::default());
            prop_assert!(footprint.w >= 4);
            prop_assert!(footprint.h >= 3);
        }
    }
}
