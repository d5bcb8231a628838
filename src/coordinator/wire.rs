//! JSON shapes exchanged with the coordinator.
//!
//! Every field is required. A node or job with a missing field makes the
//! whole response fail to decode, so a partial snapshot is never built.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of a `getallnodes` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodesResponse {
    pub nodes: Vec<NodeRecord>,
}

/// One worker node as reported by the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub ip: String,
    #[serde(deserialize_with = "string_or_number")]
    pub port: String,
    /// Running job count as reported; not derived from `jobs`.
    pub jobscount: i64,
    pub jobs: Vec<JobRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Elapsed seconds
    pub duration: f64,
    #[serde(rename = "startTime")]
    pub start_time: String,
    /// Starts with `0` while the job is still running.
    #[serde(rename = "finishTime")]
    pub finish_time: String,
}

/// Coordinators disagree on whether ids and ports are strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_coordinator_payload() {
        let body = json!({
            "nodes": [{
                "id": "5f0c6a2e-8f43-4a77-9e59-4a3c1d2b7e10",
                "name": "worker-1",
                "ip": "10.0.0.5",
                "port": ":50051",
                "jobscount": 1,
                "jobs": [{
                    "id": "0c8e4a59-1d3b-4f6f-a1f0-2b7d9e3c5a11",
                    "per": 0.5,
                    "duration": 1.5,
                    "startTime": "2024-05-01T12:00:00Z",
                    "finishTime": "0001-01-01T00:00:00Z"
                }]
            }]
        });

        let resp: NodesResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.nodes.len(), 1);
        let node = &resp.nodes[0];
        assert_eq!(node.name, "worker-1");
        assert_eq!(node.port, ":50051");
        assert_eq!(node.jobscount, 1);
        assert_eq!(node.jobs[0].start_time, "2024-05-01T12:00:00Z");
        assert_eq!(node.jobs[0].finish_time, "0001-01-01T00:00:00Z");
    }

    #[test]
    fn numeric_ids_and_ports_are_accepted() {
        let body = json!({
            "nodes": [{
                "id": 7, "name": "w", "ip": "h", "port": 8080, "jobscount": 0, "jobs": []
            }]
        });
        let resp: NodesResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.nodes[0].id, "7");
        assert_eq!(resp.nodes[0].port, "8080");
    }

    #[test]
    fn missing_job_field_fails_whole_payload() {
        let body = json!({
            "nodes": [{
                "id": "a", "name": "w", "ip": "h", "port": "1", "jobscount": 1,
                "jobs": [{ "id": "j", "duration": 1.0, "startTime": "2024-01-01T00:00:00Z" }]
            }]
        });
        assert!(serde_json::from_value::<NodesResponse>(body).is_err());
    }

    #[test]
    fn missing_nodes_key_fails() {
        assert!(serde_json::from_value::<NodesResponse>(json!({})).is_err());
    }
}
