use crate::limits::*;
use crate::model::{CalendarSettings, DateRange, EventRecord};

use super::StoreError;

pub(crate) fn validate_settings(settings: &CalendarSettings) -> Result<(), StoreError> {
    if settings.name.len() > MAX_NAME_LEN {
        return Err(StoreError::LimitExceeded("calendar name too long"));
    }
    if settings.description.len() > MAX_DESCRIPTION_LEN {
        return Err(StoreError::LimitExceeded("calendar description too long"));
    }
    if settings.color.as_ref().is_some_and(|c| c.len() > MAX_NAME_LEN) {
        return Err(StoreError::LimitExceeded("calendar color too long"));
    }
    Ok(())
}

/// Non-positive lengths are accepted; layout treats them as one day.
pub(crate) fn validate_record(record: &EventRecord) -> Result<(), StoreError> {
    if record.title.len() > MAX_NAME_LEN {
        return Err(StoreError::LimitExceeded("event title too long"));
    }
    if record.description.len() > MAX_DESCRIPTION_LEN {
        return Err(StoreError::LimitExceeded("event description too long"));
    }
    if record.length_days > MAX_EVENT_LENGTH_DAYS {
        return Err(StoreError::LimitExceeded("event too long"));
    }
    Ok(())
}

pub(crate) fn validate_window(range: &DateRange) -> Result<(), StoreError> {
    if range.len_days() > MAX_LAYOUT_WINDOW_DAYS {
        return Err(StoreError::LimitExceeded("layout window too wide"));
    }
    Ok(())
}
