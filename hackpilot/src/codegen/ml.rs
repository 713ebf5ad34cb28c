//! scikit-learn model served by FastAPI.

use super::web::PY_ROUTER;
use super::{Blueprint, FeatureTemplate, FileTemplate};

pub(super) static BLUEPRINT: Blueprint = Blueprint {
    slots: &["py_imports", "py_routers", "requirements", "env"],
    base: &[
        FileTemplate {
            path: "README.md",
            body: r#"# {{name}}

Machine learning prototype scaffolded by hackpilot ({{style}} style).

## Features

{{features_markdown}}
## Run locally

```bash
pip install -r requirements.txt
python model/train.py
uvicorn app.main:app --reload
```

Then `POST /predict` with `{"values": [5.1, 3.5, 1.4, 0.2]}`.
"#,
        },
        FileTemplate {
            path: "requirements.txt",
            body: r#"fastapi==0.115.0
uvicorn[standard]==0.30.6
pydantic==2.9.2
scikit-learn==1.5.2
joblib==1.4.2
numpy==2.1.1
{{requirements}}"#,
        },
        FileTemplate {
            path: ".env.example",
            body: "MODEL_PATH=model/model.joblib\n{{env}}",
        },
        FileTemplate {
            path: ".gitignore",
            body: "__pycache__/\n*.joblib\n.env\n",
        },
        FileTemplate {
            path: "Dockerfile",
            body: r#"FROM python:3.12-slim

WORKDIR /app

COPY requirements.txt .
RUN pip install --no-cache-dir -r requirements.txt

COPY . .
RUN python model/train.py

EXPOSE 8000

CMD ["uvicorn", "app.main:app", "--host", "0.0.0.0", "--port", "8000"]
"#,
        },
        FileTemplate {
            path: "app/__init__.py",
            body: "",
        },
        FileTemplate {
            path: "app/routes/__init__.py",
            body: "",
        },
        FileTemplate {
            path: "app/main.py",
            body: r#"import os

import joblib
from fastapi import FastAPI, HTTPException
from pydantic import BaseModel
{{py_imports}}
MODEL_PATH = os.environ.get("MODEL_PATH", "model/model.joblib")

app = FastAPI(title="{{name}}")
{{py_routers}}

class Features(BaseModel):
    values: list[float]


@app.on_event("startup")
def load_model():
    app.state.model = joblib.load(MODEL_PATH) if os.path.exists(MODEL_PATH) else None


@app.get("/health")
async def health():
    return {"status": "healthy", "model_loaded": app.state.model is not None}


@app.post("/predict")
async def predict(features: Features):
    if app.state.model is None:
        raise HTTPException(status_code=503, detail="model not trained yet")
    prediction = app.state.model.predict([features.values])
    return {"prediction": prediction.tolist()}
"#,
        },
        FileTemplate {
            path: "model/train.py",
            body: r#""""Train the {{name}} baseline model and save it next to this file."""
import os

import joblib
from sklearn.datasets import load_iris
from sklearn.ensemble import RandomForestClassifier
from sklearn.model_selection import train_test_split

MODEL_PATH = os.environ.get("MODEL_PATH", "model/model.joblib")


def main():
    X, y = load_iris(return_X_y=True)
    X_train, X_test, y_train, y_test = train_test_split(X, y, test_size=0.2, random_state=42)
    model = RandomForestClassifier(n_estimators=100, random_state=42)
    model.fit(X_train, y_train)
    print(f"test accuracy: {model.score(X_test, y_test):.3f}")
    joblib.dump(model, MODEL_PATH)


if __name__ == "__main__":
    main()
"#,
        },
        FileTemplate {
            path: "static/styles.css",
            body: "{{stylesheet}}",
        },
    ],
    per_feature: &[FileTemplate {
        path: "app/routes/{{feature}}.py",
        body: PY_ROUTER,
    }],
    per_feature_snippets: &[
        ("py_imports", "from app.routes import {{feature}}\n"),
        ("py_routers", "app.include_router({{feature}}.router)\n"),
    ],
    features: &[
        FeatureTemplate {
            name: "training",
            summary: "Repeatable training runs with a held-out evaluation report.",
            files: &[FileTemplate {
                path: "model/evaluate.py",
                body: r#"import os

import joblib
import pandas as pd
from sklearn.datasets import load_iris
from sklearn.metrics import classification_report

MODEL_PATH = os.environ.get("MODEL_PATH", "model/model.joblib")


def main():
    X, y = load_iris(return_X_y=True, as_frame=True)
    model = joblib.load(MODEL_PATH)
    report = classification_report(y, model.predict(X), output_dict=True)
    print(pd.DataFrame(report).transpose())


if __name__ == "__main__":
    main()
"#,
            }],
            snippets: &[("requirements", "pandas==2.2.3\n")],
        },
        FeatureTemplate {
            name: "inference",
            summary: "Batch and single predictions over HTTP.",
            files: &[],
            snippets: &[("env", "PREDICT_BATCH_SIZE=64\n")],
        },
        FeatureTemplate {
            name: "dataset",
            summary: "Dataset loading and versioned snapshots.",
            files: &[FileTemplate {
                path: "data/README.md",
                body: r#"# {{name}} data

Put raw files in `data/raw/` and write cleaned snapshots to `data/processed/`
as Parquet so training runs are reproducible.
"#,
            }],
            snippets: &[
                ("requirements", "pandas==2.2.3\n"),
                ("requirements", "pyarrow==17.0.0\n"),
                ("env", "DATA_DIR=data\n"),
            ],
        },
        FeatureTemplate {
            name: "dashboard",
            summary: "Static page showing model health and predictions.",
            files: &[FileTemplate {
                path: "static/index.html",
                body: r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>{{name}}</title>
    <link rel="stylesheet" href="styles.css" />
  </head>
  <body>
    <main class="container">
      <section class="card">
        <h1>{{name}}</h1>
        <p id="status">Checking model...</p>
      </section>
    </main>
    <script>
      fetch('/health')
        .then((res) => res.json())
        .then((body) => {
          document.getElementById('status').textContent =
            body.model_loaded ? 'Model ready' : 'Model not trained yet';
        });
    </script>
  </body>
</html>
"#,
            }],
            snippets: &[
                ("py_imports", "from fastapi.staticfiles import StaticFiles\n"),
                (
                    "py_routers",
                    "app.mount(\"/ui\", StaticFiles(directory=\"static\", html=True), name=\"ui\")\n",
                ),
            ],
        },
        FeatureTemplate {
            name: "api",
            summary: "Extra REST endpoints for integrating other services.",
            files: &[],
            snippets: &[("requirements", "httpx==0.27.2\n")],
        },
    ],
};
