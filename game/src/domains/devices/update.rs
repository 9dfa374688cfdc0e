use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::json;

use crate::api::{topics, TickInputs};
use crate::context::{EngineRunContext, MaintenanceTask};
use crate::devices::{
    effective_service_interval_hours, lighting_delivery_umol_m2s, DeviceMaintenance, SERVICE_TASK,
};
use crate::math::clamp01;
use crate::model::{
    map_zones, DeviceId, DeviceInstance, Knowledge, RoomPurpose, Structure, World, Zone,
};
use crate::physiology::CHANGE_EPSILON;

pub fn update_devices(
    known: &Knowledge,
    world: &Arc<World>,
    context: &mut EngineRunContext,
    inputs: TickInputs,
) -> Arc<World> {
    let completed: HashSet<DeviceId> = context
        .completed_services
        .drain(..)
        .map(|service| service.device)
        .collect();
    map_zones(world, |structure, _room, zone| {
        update_zone(known, world, structure, zone, context, inputs, &completed)
    })
}

fn update_zone(
    known: &Knowledge,
    world: &World,
    structure: &Structure,
    zone: &Arc<Zone>,
    context: &mut EngineRunContext,
    inputs: TickInputs,
    completed: &HashSet<DeviceId>,
) -> Arc<Zone> {
    let light_on = zone.lighting.is_on(world.sim_time_hours);
    let mut devices = Vec::with_capacity(zone.devices.len());
    let mut devices_changed = false;
    let mut delivered_umol_m2s = 0.0;
    let mut lighting_present = false;
    for device in &zone.devices {
        let updated = update_device(known, world, structure, zone, device, context, inputs, completed);
        if let Some(lighting) = updated.effects.lighting.as_ref() {
            lighting_present = true;
            if light_on {
                match lighting_delivery_umol_m2s(lighting, updated.condition01, zone.area_m2) {
                    Ok(delivered) => delivered_umol_m2s += delivered,
                    Err(error) => warn!(
                        "lighting effect of device {} rejected: {:?}",
                        updated.id.0, error
                    ),
                }
            }
        }
        if !Arc::ptr_eq(&updated, device) {
            devices_changed = true;
        }
        devices.push(updated);
    }

    // fixtures define the realized canopy light; without any, ambient
    // zone light stands as configured
    let ppfd_umol_m2s = if lighting_present {
        delivered_umol_m2s
    } else {
        zone.ppfd_umol_m2s
    };

    if !devices_changed && (ppfd_umol_m2s - zone.ppfd_umol_m2s).abs() <= CHANGE_EPSILON {
        return zone.clone();
    }
    Arc::new(Zone {
        ppfd_umol_m2s,
        devices,
        ..(**zone).clone()
    })
}

#[allow(clippy::too_many_arguments)]
fn update_device(
    known: &Knowledge,
    world: &World,
    structure: &Structure,
    zone: &Zone,
    device: &Arc<DeviceInstance>,
    context: &mut EngineRunContext,
    inputs: TickInputs,
    completed: &HashSet<DeviceId>,
) -> Arc<DeviceInstance> {
    let wear_per_hour01 = match known.devices.find(&device.kind) {
        Ok(kind) => kind.wear_per_hour01,
        Err(_) => {
            debug!("device kind {} unknown, wear skipped", device.kind);
            0.0
        }
    };
    let mut condition01 =
        clamp01(device.condition01 - wear_per_hour01 * (2.0 - device.quality01) * inputs.tick_hours);

    let mut maintenance = device.maintenance.clone();
    if let Some(record) = maintenance.as_mut() {
        if completed.contains(&device.id) {
            service_device(record, &mut condition01);
        }
        accrue(known, record, device, structure, zone, context, inputs, world.sim_time_hours);
    }

    let changed = maintenance.is_some() || (condition01 - device.condition01).abs() > CHANGE_EPSILON;
    if !changed {
        return device.clone();
    }
    Arc::new(DeviceInstance {
        condition01,
        maintenance,
        ..(**device).clone()
    })
}

fn service_device(record: &mut DeviceMaintenance, condition01: &mut f32) {
    record.hours_since_service = 0.0;
    record.completed_service_count += 1;
    *condition01 = (*condition01 + record.policy.restore_amount01).min(1.0);
}

#[allow(clippy::too_many_arguments)]
fn accrue(
    known: &Knowledge,
    record: &mut DeviceMaintenance,
    device: &DeviceInstance,
    structure: &Structure,
    zone: &Zone,
    context: &mut EngineRunContext,
    inputs: TickInputs,
    sim_time_hours: f32,
) {
    let hours_before_service = record.hours_since_service;
    let runtime_before = record.runtime_hours;
    record.runtime_hours += inputs.tick_hours;
    record.hours_since_service += inputs.tick_hours;

    let cost_before = record.total_maintenance_cost_cc;
    let rate = record.policy.base_cost_per_hour_cc
        + record.policy.cost_increase_per_1000h_cc * (record.runtime_hours / 1000.0);
    record.total_maintenance_cost_cc += rate * inputs.tick_hours;

    let interval = effective_service_interval_hours(&record.policy, device.quality01);
    if hours_before_service < interval && record.hours_since_service >= interval {
        schedule_service(known, record, device, structure, zone, context, sim_time_hours);
    }

    let cost_exceeded = cost_before < record.policy.replacement_cost_cc
        && record.total_maintenance_cost_cc >= record.policy.replacement_cost_cc;
    let lifetime_exceeded = runtime_before < record.policy.lifetime_hours
        && record.runtime_hours >= record.policy.lifetime_hours;
    if !record.recommended_replacement && (cost_exceeded || lifetime_exceeded) {
        record.recommended_replacement = true;
        context.replacements_recommended.push(device.id);
        context.emit_telemetry(
            topics::DEVICE_REPLACEMENT_RECOMMENDED,
            json!({
                "device": device.id.0,
                "zone": zone.id.0,
                "total_maintenance_cost_cc": record.total_maintenance_cost_cc,
                "replacement_cost_cc": record.policy.replacement_cost_cc,
                "runtime_hours": record.runtime_hours,
                "lifetime_hours": record.policy.lifetime_hours,
            }),
        );
        info!(
            "device {} passed its economic service life",
            device.id.0
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn schedule_service(
    known: &Knowledge,
    record: &DeviceMaintenance,
    device: &DeviceInstance,
    structure: &Structure,
    zone: &Zone,
    context: &mut EngineRunContext,
    sim_time_hours: f32,
) {
    let workshop = match structure.rooms_with_purpose(RoomPurpose::Workshop).next() {
        Some(workshop) => workshop,
        None => {
            debug!(
                "device {} due for service, structure {} has no workshop",
                device.id.0, structure.id.0
            );
            return;
        }
    };
    let task = match known.tasks.find(SERVICE_TASK) {
        Ok(task) => task,
        Err(_) => {
            debug!(
                "device {} due for service, task definition {} unknown",
                device.id.0, SERVICE_TASK
            );
            return;
        }
    };
    context.maintenance_tasks.push(MaintenanceTask {
        device: device.id,
        zone: zone.id,
        structure: structure.id,
        workshop: workshop.id,
        task: task.name.clone(),
        duration_hours: record.policy.service_duration_hours,
        scheduled_at_hours: sim_time_hours,
    });
    info!("device {} scheduled for service", device.id.0);
}
