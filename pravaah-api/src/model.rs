use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// `objectName` values that mark a station's entry/exit points rather than an amenity.
pub const SENTINEL_OBJECT_NAMES: [&str; 2] = ["entry", "exit"];

/// A station as returned by the search endpoint.
///
/// Every level of the envelope below the root is optional on the wire. Fields
/// this crate does not model are kept in `extra` so a cached record still
/// carries them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StationData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationData {
    #[serde(rename = "mapData", default, skip_serializing_if = "Option::is_none")]
    pub map_data: Option<MapData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<Vertex>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node of a station's map graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "objectName", default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visible: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of the amenity visibility update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmenityUpdate {
    #[serde(rename = "vertexId")]
    pub vertex_id: String,
    pub visible: bool,
}

impl StationRecord {
    /// The station's vertices, or an empty slice when any part of the
    /// `data.mapData.vertices` path is missing.
    pub fn vertices(&self) -> &[Vertex] {
        match &self.data {
            Some(StationData {
                map_data: Some(MapData {
                    vertices: Some(vertices),
                    ..
                }),
                ..
            }) => vertices,
            _ => &[],
        }
    }

    fn vertices_mut(&mut self) -> Option<&mut Vec<Vertex>> {
        self.data.as_mut()?.map_data.as_mut()?.vertices.as_mut()
    }

    /// Amenity vertices in source order.
    pub fn amenities(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices().iter().filter(|v| v.is_amenity())
    }

    /// Sets `visible` on the vertex with the given id. Every other vertex is
    /// left untouched. Returns whether a vertex matched.
    pub fn set_vertex_visibility(&mut self, vertex_id: &str, visible: bool) -> bool {
        let Some(vertices) = self.vertices_mut() else {
            return false;
        };

        let mut matched = false;
        for vertex in vertices.iter_mut().filter(|v| v.id == vertex_id) {
            vertex.visible = visible;
            matched = true;
        }
        matched
    }
}

impl Vertex {
    pub fn is_amenity(&self) -> bool {
        match self.object_name.as_deref() {
            Some(name) => !name.is_empty() && !SENTINEL_OBJECT_NAMES.contains(&name),
            None => false,
        }
    }

    /// Human readable label, e.g. `restRoom` -> `Rest Room`.
    pub fn display_label(&self) -> String {
        self.object_name
            .as_deref()
            .map(humanize_object_name)
            .unwrap_or_default()
    }
}

/// Inserts a space before every uppercase ASCII letter after the first
/// character and capitalises the first character.
pub fn humanize_object_name(name: &str) -> String {
    let mut label = String::with_capacity(name.len() + 4);
    for (idx, c) in name.chars().enumerate() {
        if idx == 0 {
            label.extend(c.to_uppercase());
            continue;
        }
        if c.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(c);
    }
    label
}

// Some stations were imported with numeric vertex ids.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for vertex id, got {}",
            other
        ))),
    }
}

// Older records carry explicit nulls; treat them as absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn central() -> StationRecord {
        serde_json::from_value(json!({
            "name": "Central",
            "data": {"mapData": {"vertices": [
                {"id": "1", "objectName": "entry", "visible": true},
                {"id": "2", "objectName": "restRoom", "visible": false},
                {"id": "3", "objectName": "ticketCounter", "visible": true, "x": 10},
                {"id": "4", "visible": true},
                {"id": "5", "objectName": "exit", "visible": true},
                {"id": "6", "objectName": "", "visible": true}
            ]}}
        }))
        .unwrap()
    }

    #[test]
    fn test_amenities_skip_sentinels_and_unnamed() {
        let record = central();
        let ids: Vec<&str> = record.amenities().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_missing_envelope_levels_yield_no_vertices() {
        for body in [
            json!({"name": "A"}),
            json!({"name": "A", "data": null}),
            json!({"name": "A", "data": {}}),
            json!({"name": "A", "data": {"mapData": {}}}),
        ] {
            let record: StationRecord = serde_json::from_value(body).unwrap();
            assert!(record.vertices().is_empty());
            assert_eq!(record.amenities().count(), 0);
        }
    }

    #[test]
    fn test_set_vertex_visibility_only_touches_match() {
        let mut record = central();
        let before = record.clone();

        assert!(record.set_vertex_visibility("2", true));
        for (old, new) in before.vertices().iter().zip(record.vertices()) {
            if old.id == "2" {
                assert!(new.visible);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_set_vertex_visibility_unknown_id() {
        let mut record = central();
        let before = record.clone();
        assert!(!record.set_vertex_visibility("99", true));
        assert_eq!(record, before);
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let record = central();
        let third = &record.vertices()[2];
        assert_eq!(third.extra.get("x"), Some(&json!(10)));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["data"]["mapData"]["vertices"][2]["x"], json!(10));
    }

    #[test]
    fn test_numeric_vertex_id() {
        let vertex: Vertex =
            serde_json::from_value(json!({"id": 42, "objectName": "lift"})).unwrap();
        assert_eq!(vertex.id, "42");
        assert!(!vertex.visible);
    }

    #[test]
    fn test_null_fields_do_not_reject_station() {
        let record: StationRecord = serde_json::from_value(json!({
            "name": null,
            "data": {"mapData": {"vertices": [
                {"id": "1", "objectName": "lift", "visible": null},
                {"objectName": "restRoom", "visible": true},
                {"id": null, "objectName": "atm"}
            ]}}
        }))
        .unwrap();

        assert_eq!(record.name, "");
        let amenities: Vec<&Vertex> = record.amenities().collect();
        assert_eq!(amenities.len(), 3);
        assert_eq!(amenities[0].id, "1");
        assert!(!amenities[0].visible);
        assert_eq!(amenities[1].id, "");
        assert!(amenities[1].visible);
        assert_eq!(amenities[2].id, "");
    }

    #[test]
    fn test_humanize_object_name() {
        assert_eq!(humanize_object_name("restRoom"), "Rest Room");
        assert_eq!(humanize_object_name("ticketCounterWest"), "Ticket Counter West");
        assert_eq!(humanize_object_name("lift"), "Lift");
        assert_eq!(humanize_object_name("ATM"), "A T M");
        assert_eq!(humanize_object_name(""), "");
    }

    #[test]
    fn test_update_body_wire_names() {
        let body = AmenityUpdate {
            vertex_id: "2".to_string(),
            visible: true,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"vertexId": "2", "visible": true})
        );
    }
}
