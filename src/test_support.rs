//! In-process fake of the remote API for session and view tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::{
    ApiError, ApiResult, AuthResponse, HealthApi, LoginRequest, MealDraft, MealLinkRequest,
    MedicationDraft, ProfilePayload, ProfileUpdate, ReadingDraft, ReadingPatch, SignupRequest,
};
use crate::models::{
    BmiCategory, BmiReport, Credential, DiabetesType, Meal, MealLink, Medication,
    MedicationStatus, Reading, UserProfile,
};
use crate::session::SessionStore;
use crate::storage::{ClientStorage, MemoryStorage, StorageError, StorageResult};

pub(crate) const TOKEN: &str = "tok123";

/// How the fake answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Accept,
    /// Every authenticated call is rejected with 401
    Reject,
    /// Every call fails as if the server were down
    Offline,
}

pub(crate) struct StubApi {
    mode: Mutex<Mode>,
    calls: Mutex<Vec<&'static str>>,
    profile: Mutex<UserProfile>,
    readings: Mutex<Vec<Reading>>,
    medications: Mutex<Vec<Medication>>,
    meals: Mutex<Vec<Meal>>,
    next_id: AtomicI64,
}

pub(crate) fn education_for(diabetes_type: Option<DiabetesType>) -> Vec<String> {
    match diabetes_type {
        Some(DiabetesType::Type1) => vec![
            "Type 1 diabetes: autoimmune; requires insulin therapy.".to_string(),
            "Carry fast-acting glucose to treat lows.".to_string(),
        ],
        Some(DiabetesType::Type2) => vec![
            "Type 2 diabetes: insulin resistance; lifestyle and meds help.".to_string(),
        ],
        Some(_) => vec!["Follow your meal plan and stay active.".to_string()],
        None => Vec::new(),
    }
}

impl StubApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            mode: Mutex::new(Mode::Accept),
            calls: Mutex::new(Vec::new()),
            profile: Mutex::new(UserProfile::new("A", "a@b.com")),
            readings: Mutex::new(Vec::new()),
            medications: Mutex::new(Vec::new()),
            meals: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        })
    }

    pub(crate) fn set_mode(&self, mode: Mode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub(crate) fn set_profile(&self, profile: UserProfile) {
        *self.profile.lock().unwrap() = profile;
    }

    /// Names of the calls received so far, in order
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| **c == name).count()
    }

    pub(crate) fn seed_reading(&self, reading: Reading) {
        self.readings.lock().unwrap().push(reading);
    }

    pub(crate) fn seed_medication(&self, medication: Medication) {
        self.medications.lock().unwrap().push(medication);
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(100, Ordering::SeqCst)
    }

    /// Record the call and fail it according to the current mode
    fn guard(&self, name: &'static str, token: Option<&Credential>) -> ApiResult<()> {
        self.calls.lock().unwrap().push(name);

        match *self.mode.lock().unwrap() {
            Mode::Offline => Err(ApiError::Unavailable),
            Mode::Reject if token.is_some() => Err(unauthorized()),
            _ => match token {
                Some(t) if t.as_str() != TOKEN => Err(unauthorized()),
                _ => Ok(()),
            },
        }
    }
}

fn unauthorized() -> ApiError {
    ApiError::Rejected {
        status: 401,
        message: "Session check failed".to_string(),
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Rejected {
        status: 404,
        message: format!("{} not found", what),
    }
}

#[async_trait]
impl HealthApi for StubApi {
    async fn check_session(&self, token: &Credential) -> ApiResult<ProfilePayload> {
        self.guard("check_session", Some(token))?;
        let profile = self.profile.lock().unwrap().clone();
        let education = Some(education_for(profile.diabetes_type));
        Ok(ProfilePayload { profile, education })
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.guard("login", None)?;
        if request.email == "a@b.com" && request.password == "secret1" {
            Ok(AuthResponse {
                access_token: Credential::new(TOKEN),
                user: UserProfile::new("A", "a@b.com"),
                education: Some(Vec::new()),
            })
        } else {
            Err(ApiError::Rejected {
                status: 401,
                message: "Invalid email or password".to_string(),
            })
        }
    }

    async fn signup(&self, request: &SignupRequest) -> ApiResult<AuthResponse> {
        self.guard("signup", None)?;
        if request.email == "a@b.com" {
            return Err(ApiError::Rejected {
                status: 400,
                message: "User with this email already exists".to_string(),
            });
        }
        let mut user = UserProfile::new(request.name.clone(), request.email.clone());
        user.diabetes_type = request.diabetes_type;
        *self.profile.lock().unwrap() = user.clone();
        Ok(AuthResponse {
            access_token: Credential::new(TOKEN),
            education: Some(education_for(user.diabetes_type)),
            user,
        })
    }

    async fn bmi(&self, token: &Credential) -> ApiResult<BmiReport> {
        self.guard("bmi", Some(token))?;
        let profile = self.profile.lock().unwrap().clone();
        match (profile.height_cm, profile.weight_kg) {
            (Some(h), Some(w)) if h > 0.0 && w > 0.0 => {
                let bmi = w / ((h / 100.0) * (h / 100.0));
                let category = if bmi < 18.5 {
                    BmiCategory::Underweight
                } else if bmi < 25.0 {
                    BmiCategory::Normal
                } else if bmi < 30.0 {
                    BmiCategory::Overweight
                } else {
                    BmiCategory::Obese
                };
                Ok(BmiReport {
                    bmi: (bmi * 10.0).round() / 10.0,
                    category,
                })
            }
            _ => Err(ApiError::Rejected {
                status: 400,
                message: "height_cm and weight_kg must be set on profile".to_string(),
            }),
        }
    }

    async fn update_profile(
        &self,
        token: &Credential,
        update: &ProfileUpdate,
    ) -> ApiResult<ProfilePayload> {
        self.guard("update_profile", Some(token))?;
        let mut profile = self.profile.lock().unwrap();
        profile.diabetes_type = update.diabetes_type;
        profile.height_cm = update.height_cm;
        profile.weight_kg = update.weight_kg;
        Ok(ProfilePayload {
            profile: profile.clone(),
            education: Some(education_for(profile.diabetes_type)),
        })
    }

    async fn list_readings(&self, token: &Credential) -> ApiResult<Vec<Reading>> {
        self.guard("list_readings", Some(token))?;
        Ok(self.readings.lock().unwrap().clone())
    }

    async fn create_reading(&self, token: &Credential, draft: &ReadingDraft) -> ApiResult<Reading> {
        self.guard("create_reading", Some(token))?;
        let reading = Reading {
            id: self.next_id(),
            value: draft.value,
            date: draft.date,
            time: draft.time,
            context: draft.context,
            notes: draft.notes.clone(),
            created_at: None,
            user_id: Some(1),
            evaluation: None,
        };
        self.readings.lock().unwrap().push(reading.clone());
        Ok(reading)
    }

    async fn get_reading(&self, token: &Credential, id: i64) -> ApiResult<Reading> {
        self.guard("get_reading", Some(token))?;
        self.readings
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found("Reading"))
    }

    async fn update_reading(
        &self,
        token: &Credential,
        id: i64,
        patch: &ReadingPatch,
    ) -> ApiResult<Reading> {
        self.guard("update_reading", Some(token))?;
        let mut readings = self.readings.lock().unwrap();
        let reading = readings
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("Reading"))?;
        if let Some(value) = patch.value {
            reading.value = value;
        }
        if let Some(context) = patch.context {
            reading.context = context;
        }
        if let Some(notes) = &patch.notes {
            reading.notes = Some(notes.clone());
        }
        Ok(reading.clone())
    }

    async fn delete_reading(&self, token: &Credential, id: i64) -> ApiResult<()> {
        self.guard("delete_reading", Some(token))?;
        let mut readings = self.readings.lock().unwrap();
        let before = readings.len();
        readings.retain(|r| r.id != id);
        if readings.len() == before {
            Err(not_found("Reading"))
        } else {
            Ok(())
        }
    }

    async fn list_medications(&self, token: &Credential) -> ApiResult<Vec<Medication>> {
        self.guard("list_medications", Some(token))?;
        Ok(self.medications.lock().unwrap().clone())
    }

    async fn create_medication(
        &self,
        token: &Credential,
        draft: &MedicationDraft,
    ) -> ApiResult<Medication> {
        self.guard("create_medication", Some(token))?;
        let medication = Medication {
            id: self.next_id(),
            name: draft.name.clone(),
            dose: draft.dose.clone(),
            time: draft.time,
            status: draft.status,
            created_at: None,
            user_id: Some(1),
        };
        self.medications.lock().unwrap().push(medication.clone());
        Ok(medication)
    }

    async fn update_medication_status(
        &self,
        token: &Credential,
        id: i64,
        status: MedicationStatus,
    ) -> ApiResult<Medication> {
        self.guard("update_medication_status", Some(token))?;
        let mut medications = self.medications.lock().unwrap();
        let medication = medications
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("Medication"))?;
        medication.status = status;
        Ok(medication.clone())
    }

    async fn list_meals(&self, token: &Credential) -> ApiResult<Vec<Meal>> {
        self.guard("list_meals", Some(token))?;
        Ok(self.meals.lock().unwrap().clone())
    }

    async fn create_meal(&self, token: &Credential, draft: &MealDraft) -> ApiResult<Meal> {
        self.guard("create_meal", Some(token))?;
        let meal = Meal {
            id: self.next_id(),
            name: draft.name.clone(),
            meal_type: draft.meal_type.clone(),
            description: draft.description.clone(),
            created_at: None,
        };
        self.meals.lock().unwrap().push(meal.clone());
        Ok(meal)
    }

    async fn link_meal(
        &self,
        token: &Credential,
        reading_id: i64,
        request: &MealLinkRequest,
    ) -> ApiResult<MealLink> {
        self.guard("link_meal", Some(token))?;
        if !self.readings.lock().unwrap().iter().any(|r| r.id == reading_id) {
            return Err(not_found("Reading"));
        }
        if !self.meals.lock().unwrap().iter().any(|m| m.id == request.meal_id) {
            return Err(not_found("Meal"));
        }
        Ok(MealLink {
            message: "linked".to_string(),
            reading_id,
            meal_id: request.meal_id,
            carbs_amount: request.carbs_amount,
        })
    }

    async fn unlink_meal(&self, token: &Credential, _reading_id: i64, _meal_id: i64) -> ApiResult<()> {
        self.guard("unlink_meal", Some(token))
    }
}

/// A fresh session over `storage`, talking to `api`
pub(crate) fn session_over(storage: &MemoryStorage, api: &Arc<StubApi>) -> Arc<SessionStore> {
    Arc::new(SessionStore::new(
        Arc::new(storage.clone()),
        Arc::clone(api) as Arc<dyn HealthApi>,
    ))
}

/// A session that is already logged in as `A <a@b.com>`
pub(crate) async fn logged_in_session(api: &Arc<StubApi>) -> (Arc<SessionStore>, MemoryStorage) {
    use crate::session::Session;

    let storage = MemoryStorage::new();
    let session = session_over(&storage, api);
    session
        .login(&LoginRequest {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
    (session, storage)
}

/// Storage that reads from `inner` and refuses every write
pub(crate) struct ReadOnlyStorage {
    pub(crate) inner: MemoryStorage,
}

impl ReadOnlyStorage {
    fn refuse() -> StorageError {
        StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only storage",
        ))
    }
}

impl ClientStorage for ReadOnlyStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(Self::refuse())
    }

    fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Err(Self::refuse())
    }

    fn clear(&self) -> StorageResult<()> {
        Err(Self::refuse())
    }
}
